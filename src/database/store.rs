use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{NewNote, Note};
use crate::database::pagination::PageRequest;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("note {0} does not exist")]
    Missing(i64),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence for notes.
///
/// Every read is scoped to an owner: a note that exists but belongs to
/// someone else is reported exactly like a note that does not exist.
/// `update` and `delete_by_id` are not scoped; callers must have checked
/// ownership first.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Persist a new note and return it with its freshly assigned id.
    async fn create(&self, note: NewNote) -> Result<Note, StoreError>;

    async fn find_by_id_and_owner(&self, id: i64, owner: &str) -> Result<Option<Note>, StoreError>;

    async fn exists_by_id_and_owner(&self, id: i64, owner: &str) -> Result<bool, StoreError>;

    /// One page of `owner`'s notes in the requested order.
    async fn list_by_owner(&self, owner: &str, page: &PageRequest) -> Result<Vec<Note>, StoreError>;

    /// Overwrite the record with `note.id`. Fails with `Missing` if it is gone.
    async fn update(&self, note: &Note) -> Result<(), StoreError>;

    /// Remove the record. Deleting an absent id is not an error.
    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
