//! Note repository implementation.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row, Transaction};
use tracing::error;

use notable_core::{
    CreateNoteRequest, Error, Note, NoteRepository, Result, Tag, TagInput, UpdateNoteRequest,
};

/// PostgreSQL implementation of NoteRepository.
///
/// Every operation runs inside its own transaction. On a store error the
/// transaction is rolled back, the failure is logged, and the error is
/// propagated unchanged; absence is reported as `Ok(None)`.
#[derive(Clone)]
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Deduplicate requested tag names, preserving first-seen order.
fn distinct_tag_names(tags: &[TagInput]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for tag in tags {
        if seen.insert(tag.name.as_str()) {
            names.push(tag.name.clone());
        }
    }
    names
}

/// Fetch a note with its tags, or None if the id is unknown.
async fn fetch_note_tx(tx: &mut Transaction<'_, Postgres>, id: i32) -> Result<Option<Note>> {
    let row = sqlx::query("SELECT id, title, description FROM notes WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(Error::Database)?;

    let Some(row) = row else {
        return Ok(None);
    };

    let tags = sqlx::query_as::<_, Tag>(
        "SELECT t.id, t.name FROM tags t
         JOIN notes_tags nt ON nt.tag_id = t.id
         WHERE nt.note_id = $1
         ORDER BY t.id",
    )
    .bind(id)
    .fetch_all(&mut **tx)
    .await
    .map_err(Error::Database)?;

    Ok(Some(Note {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        tags,
    }))
}

/// Resolve each requested tag name to a row, creating missing ones.
///
/// The upsert makes the name the concurrency boundary: two transactions
/// racing on the same new name both land on the row that wins the unique
/// index on `tags.name`, never on duplicates.
async fn resolve_tags_tx(
    tx: &mut Transaction<'_, Postgres>,
    requested: &[TagInput],
) -> Result<Vec<Tag>> {
    let mut tags = Vec::new();
    for name in distinct_tag_names(requested) {
        let tag = sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (name) VALUES ($1)
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING id, name",
        )
        .bind(&name)
        .fetch_one(&mut **tx)
        .await
        .map_err(Error::Database)?;
        tags.push(tag);
    }
    Ok(tags)
}

async fn create_tx(tx: &mut Transaction<'_, Postgres>, req: CreateNoteRequest) -> Result<Note> {
    let tags = match &req.tags {
        Some(requested) => resolve_tags_tx(tx, requested).await?,
        None => Vec::new(),
    };

    let note_id: i32 =
        sqlx::query_scalar("INSERT INTO notes (title, description) VALUES ($1, $2) RETURNING id")
            .bind(&req.title)
            .bind(&req.description)
            .fetch_one(&mut **tx)
            .await
            .map_err(Error::Database)?;

    for tag in &tags {
        sqlx::query("INSERT INTO notes_tags (note_id, tag_id) VALUES ($1, $2)")
            .bind(note_id)
            .bind(tag.id)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;
    }

    // Refresh from storage to return generated id and final association state
    fetch_note_tx(tx, note_id)
        .await?
        .ok_or_else(|| Error::Internal(format!("note {} vanished inside its own transaction", note_id)))
}

async fn list_tx(tx: &mut Transaction<'_, Postgres>) -> Result<Vec<Note>> {
    let note_rows = sqlx::query("SELECT id, title, description FROM notes")
        .fetch_all(&mut **tx)
        .await
        .map_err(Error::Database)?;

    let tag_rows = sqlx::query(
        "SELECT nt.note_id, t.id, t.name FROM notes_tags nt
         JOIN tags t ON t.id = nt.tag_id
         ORDER BY nt.note_id, t.id",
    )
    .fetch_all(&mut **tx)
    .await
    .map_err(Error::Database)?;

    let mut tags_by_note: HashMap<i32, Vec<Tag>> = HashMap::new();
    for row in tag_rows {
        tags_by_note
            .entry(row.get("note_id"))
            .or_default()
            .push(Tag {
                id: row.get("id"),
                name: row.get("name"),
            });
    }

    let notes = note_rows
        .into_iter()
        .map(|row| {
            let id: i32 = row.get("id");
            Note {
                id,
                title: row.get("title"),
                description: row.get("description"),
                tags: tags_by_note.remove(&id).unwrap_or_default(),
            }
        })
        .collect();

    Ok(notes)
}

async fn update_tx(
    tx: &mut Transaction<'_, Postgres>,
    id: i32,
    req: UpdateNoteRequest,
) -> Result<Option<Note>> {
    if fetch_note_tx(tx, id).await?.is_none() {
        return Ok(None);
    }

    sqlx::query("UPDATE notes SET title = $1, description = $2 WHERE id = $3")
        .bind(&req.title)
        .bind(&req.description)
        .bind(id)
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;

    fetch_note_tx(tx, id).await
}

async fn delete_tx(tx: &mut Transaction<'_, Postgres>, id: i32) -> Result<Option<Note>> {
    let Some(snapshot) = fetch_note_tx(tx, id).await? else {
        return Ok(None);
    };

    // Join rows go with the note via ON DELETE CASCADE
    sqlx::query("DELETE FROM notes WHERE id = $1")
        .bind(id)
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;

    Ok(Some(snapshot))
}

/// Log a failed operation and roll the transaction back.
async fn rollback_on_error(tx: Transaction<'_, Postgres>, op: &str, e: &Error) {
    error!(
        subsystem = "database",
        component = "notes",
        op = op,
        error = %e,
        "Note operation failed, rolling back"
    );
    let _ = tx.rollback().await;
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn create(&self, req: CreateNoteRequest) -> Result<Note> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        match create_tx(&mut tx, req).await {
            Ok(note) => {
                tx.commit().await.map_err(Error::Database)?;
                Ok(note)
            }
            Err(e) => {
                rollback_on_error(tx, "create", &e).await;
                Err(e)
            }
        }
    }

    async fn list(&self) -> Result<Vec<Note>> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        match list_tx(&mut tx).await {
            Ok(notes) => {
                tx.commit().await.map_err(Error::Database)?;
                Ok(notes)
            }
            Err(e) => {
                rollback_on_error(tx, "list", &e).await;
                Err(e)
            }
        }
    }

    async fn get(&self, id: i32) -> Result<Option<Note>> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        match fetch_note_tx(&mut tx, id).await {
            Ok(note) => {
                tx.commit().await.map_err(Error::Database)?;
                Ok(note)
            }
            Err(e) => {
                rollback_on_error(tx, "get", &e).await;
                Err(e)
            }
        }
    }

    async fn update(&self, id: i32, req: UpdateNoteRequest) -> Result<Option<Note>> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        match update_tx(&mut tx, id, req).await {
            Ok(note) => {
                tx.commit().await.map_err(Error::Database)?;
                Ok(note)
            }
            Err(e) => {
                rollback_on_error(tx, "update", &e).await;
                Err(e)
            }
        }
    }

    async fn delete(&self, id: i32) -> Result<Option<Note>> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        match delete_tx(&mut tx, id).await {
            Ok(note) => {
                tx.commit().await.map_err(Error::Database)?;
                Ok(note)
            }
            Err(e) => {
                rollback_on_error(tx, "delete", &e).await;
                Err(e)
            }
        }
    }
}
