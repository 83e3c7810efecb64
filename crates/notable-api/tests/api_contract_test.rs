//! Wire-contract tests for the notes/tags API.
//!
//! These pin down the serialized request and response shapes the HTTP
//! surface promises, without needing a running server or database.

use notable_core::{
    CreateNoteRequest, Note, NoteProjection, Tag, TagNotesLookup, UpdateNoteRequest,
};

#[test]
fn test_create_request_accepts_optional_tag_list() {
    // POST /api/notes body with tags
    let body = r#"{"title":"T1","description":"D1","tags":[{"name":"urgent"}]}"#;
    let req: CreateNoteRequest = serde_json::from_str(body).unwrap();
    assert_eq!(req.title, "T1");
    assert_eq!(req.tags.unwrap()[0].name, "urgent");

    // and without
    let body = r#"{"title":"T1","description":"D1"}"#;
    let req: CreateNoteRequest = serde_json::from_str(body).unwrap();
    assert!(req.tags.is_none());
}

#[test]
fn test_create_request_rejects_missing_title() {
    let body = r#"{"description":"D1"}"#;
    assert!(serde_json::from_str::<CreateNoteRequest>(body).is_err());
}

#[test]
fn test_update_request_carries_title_and_description_only() {
    let body = r#"{"title":"T2","description":"D2"}"#;
    let req: UpdateNoteRequest = serde_json::from_str(body).unwrap();
    assert_eq!(req.title, "T2");
    assert_eq!(req.description, "D2");
}

#[test]
fn test_note_response_shape() {
    let note = Note {
        id: 3,
        title: "T1".to_string(),
        description: "D1".to_string(),
        tags: vec![Tag {
            id: 1,
            name: "urgent".to_string(),
        }],
    };

    let json = serde_json::to_value(&note).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": 3,
            "title": "T1",
            "description": "D1",
            "tags": [{"id": 1, "name": "urgent"}]
        })
    );
}

#[test]
fn test_tag_lookup_hit_shape() {
    // GET /api/tags/urgent after tagging one note
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
fn test_tag_lookup_miss_is_a_message_body_not_a_404() {
    // GET /api/tags/nonexistent answers 200 with this exact body
    let json = serde_json::to_value(TagNotesLookup::missing()).unwrap();
    assert_eq!(json, serde_json::json!({"message": "Tags not found"}));
}

#[test]
fn test_miss_body_differs_from_empty_hit_body() {
    // An existing tag with no notes keeps the found shape; only an unknown
    // name yields the sentinel
    let empty_hit = TagNotesLookup::Found {
        tag_name: "orphan".to_string(),
        notes: vec![],
    };
    assert_ne!(
        serde_json::to_value(&empty_hit).unwrap(),
        serde_json::to_value(TagNotesLookup::missing()).unwrap()
    );
}
