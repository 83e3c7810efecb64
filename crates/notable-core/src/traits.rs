//! Repository trait definitions.
//!
//! The HTTP layer only ever talks to the store through these traits; it never
//! issues SQL of its own.

use async_trait::async_trait;

use crate::{CreateNoteRequest, Note, Result, Tag, TagNotesLookup, UpdateNoteRequest};

/// Repository for note CRUD operations.
///
/// Absence is a domain-expected outcome: lookups return `Ok(None)` for an
/// unknown id rather than an error. Store failures are always errors.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Create a note with optional tags, reusing existing tag rows by name.
    ///
    /// Atomic: the note, any newly created tags, and their associations
    /// persist together or not at all.
    async fn create(&self, req: CreateNoteRequest) -> Result<Note>;

    /// List all notes with their tags, in store-default order.
    async fn list(&self) -> Result<Vec<Note>>;

    /// Fetch a single note by id.
    async fn get(&self, id: i32) -> Result<Option<Note>>;

    /// Overwrite a note's title and description. Tags are untouched.
    async fn update(&self, id: i32, req: UpdateNoteRequest) -> Result<Option<Note>>;

    /// Delete a note and its tag associations, returning the pre-deletion
    /// snapshot.
    async fn delete(&self, id: i32) -> Result<Option<Note>>;
}

/// Repository for tag queries.
///
/// Tags are created lazily through note creation and are never deleted or
/// renamed through this layer.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// List every tag, associations not expanded.
    async fn list(&self) -> Result<Vec<Tag>>;

    /// Look up a tag by exact name along with the notes that reference it.
    ///
    /// A miss returns the sentinel lookup result, not `Err`.
    async fn get_by_name_with_notes(&self, name: &str) -> Result<TagNotesLookup>;
}
