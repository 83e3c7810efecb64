//! Core data models for notable.
//!
//! These types are shared across the notable crates and double as the wire
//! format for the HTTP API, so field names and shapes are part of the
//! external contract.

use serde::{Deserialize, Serialize};

// =============================================================================
// TAG TYPES
// =============================================================================

/// A named label reusable across many notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}

/// Tag reference supplied by clients when creating a note.
///
/// Only the name is accepted; ids are assigned by the store. An unseen name
/// creates the tag lazily, a known name reuses the existing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagInput {
    pub name: String,
}

// =============================================================================
// NOTE TYPES
// =============================================================================

/// The primary content entity: a title and a description, optionally tagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub tags: Vec<Tag>,
}

/// Input for creating a note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
    pub description: String,
    pub tags: Option<Vec<TagInput>>,
}

/// Input for updating a note.
///
/// Only title and description are mutable; tag associations are fixed at
/// creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateNoteRequest {
    pub title: String,
    pub description: String,
}

// =============================================================================
// TAG LOOKUP TYPES
// =============================================================================

/// Projection of a note as returned by the tag lookup endpoint.
///
/// No id and no nested tags, matching the published response shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteProjection {
    pub title: String,
    pub description: String,
}

/// Result of looking up a tag by name together with the notes that use it.
///
/// A miss is reported as a well-formed sentinel body with HTTP 200, not as an
/// absent result or a 404. Existing clients depend on this asymmetry with the
/// note lookups, so it is part of the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagNotesLookup {
    Found {
        tag_name: String,
        notes: Vec<NoteProjection>,
    },
    Missing {
        message: String,
    },
}

impl TagNotesLookup {
    /// The sentinel returned when no tag matches the requested name.
    pub fn missing() -> Self {
        TagNotesLookup::Missing {
            message: "Tags not found".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_serializes_with_tags() {
        let note = Note {
            id: 1,
            title: "T1".to_string(),
            description: "D1".to_string(),
            tags: vec![Tag {
                id: 7,
                name: "urgent".to_string(),
            }],
        };

        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "title": "T1",
                "description": "D1",
                "tags": [{"id": 7, "name": "urgent"}]
            })
        );
    }

    #[test]
    fn test_create_request_tags_optional() {
        let req: CreateNoteRequest =
            serde_json::from_str(r#"{"title":"T","description":"D"}"#).unwrap();
        assert!(req.tags.is_none());

        let req: CreateNoteRequest =
            serde_json::from_str(r#"{"title":"T","description":"D","tags":[{"name":"a"}]}"#)
                .unwrap();
        assert_eq!(req.tags.unwrap(), vec![TagInput { name: "a".into() }]);
    }

    #[test]
    fn test_tag_lookup_found_shape() {
        let lookup = TagNotesLookup::Found {
            tag_name: "urgent".to_string(),
            notes: vec![NoteProjection {
                title: "T1".to_string(),
                description: "D1".to_string(),
            }],
        };

        let json = serde_json::to_value(&lookup).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "tag_name": "urgent",
                "notes": [{"title": "T1", "description": "D1"}]
            })
        );
    }

    #[test]
    fn test_tag_lookup_sentinel_shape() {
        let json = serde_json::to_value(TagNotesLookup::missing()).unwrap();
        assert_eq!(json, serde_json::json!({"message": "Tags not found"}));
    }

    #[test]
    fn test_tag_lookup_roundtrip_distinguishes_variants() {
        let found: TagNotesLookup =
            serde_json::from_str(r#"{"tag_name":"a","notes":[]}"#).unwrap();
        assert!(matches!(found, TagNotesLookup::Found { .. }));

        let missing: TagNotesLookup =
            serde_json::from_str(r#"{"message":"Tags not found"}"#).unwrap();
        assert_eq!(missing, TagNotesLookup::missing());
    }
}
