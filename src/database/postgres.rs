use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::database::models::{NewNote, Note};
use crate::database::pagination::{PageRequest, SortField};
use crate::database::store::{NoteStore, StoreError};

/// Note store backed by the `notes` table.
#[derive(Clone)]
pub struct PgNoteStore {
    pool: PgPool,
}

impl PgNoteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `ORDER BY` clause built only from the closed set of sortable columns.
///
/// Text columns sort under `COLLATE "C"` so the order is byte-wise, the same
/// as `MemoryNoteStore`.
fn order_by_clause(page: &PageRequest) -> String {
    page.effective_sort()
        .iter()
        .map(|order| match order.field {
            SortField::Id => format!("id {}", order.direction.keyword()),
            field => format!(
                "{} COLLATE \"C\" {}",
                field.column(),
                order.direction.keyword()
            ),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn create(&self, note: NewNote) -> Result<Note, StoreError> {
        let created = sqlx::query_as::<_, Note>(
            "INSERT INTO notes (title, content, owner)
             VALUES ($1, $2, $3)
             RETURNING id, title, content, owner",
        )
        .bind(&note.title)
        .bind(&note.content)
        .bind(&note.owner)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id_and_owner(&self, id: i64, owner: &str) -> Result<Option<Note>, StoreError> {
        let note = sqlx::query_as::<_, Note>(
            "SELECT id, title, content, owner
             FROM notes
             WHERE id = $1 AND owner = $2",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(note)
    }

    async fn exists_by_id_and_owner(&self, id: i64, owner: &str) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM notes WHERE id = $1 AND owner = $2)",
        )
        .bind(id)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn list_by_owner(&self, owner: &str, page: &PageRequest) -> Result<Vec<Note>, StoreError> {
        let sql = format!(
            "SELECT id, title, content, owner
             FROM notes
             WHERE owner = $1
             ORDER BY {}
             LIMIT $2 OFFSET $3",
            order_by_clause(page)
        );
        debug!("list_by_owner: {}", sql);

        let notes = sqlx::query_as::<_, Note>(&sql)
            .bind(owner)
            .bind(i64::from(page.size))
            .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        Ok(notes)
    }

    async fn update(&self, note: &Note) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE notes SET title = $2, content = $3, owner = $4 WHERE id = $1",
        )
        .bind(note.id)
        .bind(&note.title)
        .bind(&note.content)
        .bind(&note.owner)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Missing(note.id));
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
