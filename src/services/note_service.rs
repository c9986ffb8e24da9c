use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::auth::Principal;
use crate::config::NoteLimits;
use crate::database::{NewNote, Note, NotePayload, NoteStore, PageRequest, StoreError};

use super::validation::{validate_note, ValidationError};

#[derive(Debug, Error)]
pub enum NoteError {
    /// Absent, or owned by someone else. Deliberately indistinguishable.
    #[error("note {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Owner-scoped note operations on behalf of an authenticated principal.
///
/// The owner of a note is always the principal performing the write; any
/// owner supplied in a payload is discarded.
#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn NoteStore>,
    limits: NoteLimits,
}

impl NoteService {
    pub fn new(store: Arc<dyn NoteStore>, limits: NoteLimits) -> Self {
        Self { store, limits }
    }

    pub async fn find(&self, id: i64, principal: &Principal) -> Result<Note, NoteError> {
        self.store
            .find_by_id_and_owner(id, &principal.name)
            .await?
            .ok_or(NoteError::NotFound(id))
    }

    pub async fn list(&self, principal: &Principal, page: &PageRequest) -> Result<Vec<Note>, NoteError> {
        Ok(self.store.list_by_owner(&principal.name, page).await?)
    }

    pub async fn create(&self, payload: NotePayload, principal: &Principal) -> Result<Note, NoteError> {
        if payload.owner.as_deref().is_some_and(|o| o != principal.name) {
            debug!("Ignoring client-supplied owner for note created by '{}'", principal.name);
        }

        let note = NewNote {
            title: payload.title.ok_or(ValidationError::Missing { field: "title" })?,
            content: payload.content.ok_or(ValidationError::Missing { field: "content" })?,
            owner: principal.name.clone(),
        };
        validate_note(&note.title, &note.content, &note.owner, &self.limits)?;

        let created = self.store.create(note).await?;
        info!("Note {} created by '{}'", created.id, principal.name);
        Ok(created)
    }

    /// Replace title and content of an owned note. Existence is checked before validation.
    pub async fn update(&self, id: i64, payload: NotePayload, principal: &Principal) -> Result<Note, NoteError> {
        let existing = self.find(id, principal).await?;

        let updated = Note {
            id: existing.id,
            title: payload.title.ok_or(ValidationError::Missing { field: "title" })?,
            content: payload.content.ok_or(ValidationError::Missing { field: "content" })?,
            owner: principal.name.clone(),
        };
        validate_note(&updated.title, &updated.content, &updated.owner, &self.limits)?;

        self.store.update(&updated).await?;
        info!("Note {} updated by '{}'", id, principal.name);
        Ok(updated)
    }

    pub async fn delete(&self, id: i64, principal: &Principal) -> Result<(), NoteError> {
        if !self.store.exists_by_id_and_owner(id, &principal.name).await? {
            return Err(NoteError::NotFound(id));
        }

        self.store.delete_by_id(id).await?;
        info!("Note {} deleted by '{}'", id, principal.name);
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), StoreError> {
        self.store.health_check().await
    }
}
