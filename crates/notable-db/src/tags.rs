//! Tag repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use tracing::error;

use notable_core::{Error, NoteProjection, Result, Tag, TagNotesLookup, TagRepository};

/// PostgreSQL implementation of TagRepository.
///
/// Read-only: tags come into existence through note creation and are never
/// deleted or renamed here.
#[derive(Clone)]
pub struct PgTagRepository {
    pool: Pool<Postgres>,
}

impl PgTagRepository {
    /// Create a new PgTagRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for PgTagRepository {
    async fn list(&self) -> Result<Vec<Tag>> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let result = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags ORDER BY id")
            .fetch_all(&mut *tx)
            .await
            .map_err(Error::Database);

        match result {
            Ok(tags) => {
                tx.commit().await.map_err(Error::Database)?;
                Ok(tags)
            }
            Err(e) => {
                error!(
                    subsystem = "database",
                    component = "tags",
                    op = "list",
                    error = %e,
                    "Tag listing failed, rolling back"
                );
                let _ = tx.rollback().await;
                Err(e)
            }
        }
    }

    async fn get_by_name_with_notes(&self, name: &str) -> Result<TagNotesLookup> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let result: Result<TagNotesLookup> = async {
            let tag = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE name = $1")
                .bind(name)
                .fetch_optional(&mut *tx)
                .await
                .map_err(Error::Database)?;

            // An unknown name is a sentinel body, not an error and not a 404
            let Some(tag) = tag else {
                return Ok(TagNotesLookup::missing());
            };

            let rows = sqlx::query(
                "SELECT n.title, n.description FROM notes n
                 JOIN notes_tags nt ON nt.note_id = n.id
                 WHERE nt.tag_id = $1",
            )
            .bind(tag.id)
            .fetch_all(&mut *tx)
            .await
            .map_err(Error::Database)?;

            let notes = rows
                .into_iter()
                .map(|row| NoteProjection {
                    title: row.get("title"),
                    description: row.get("description"),
                })
                .collect();

            Ok(TagNotesLookup::Found {
                tag_name: tag.name,
                notes,
            })
        }
        .await;

        match result {
            Ok(lookup) => {
                tx.commit().await.map_err(Error::Database)?;
                Ok(lookup)
            }
            Err(e) => {
                error!(
                    subsystem = "database",
                    component = "tags",
                    op = "get_by_name_with_notes",
                    tag_name = name,
                    error = %e,
                    "Tag lookup failed, rolling back"
                );
                let _ = tx.rollback().await;
                Err(e)
            }
        }
    }
}
