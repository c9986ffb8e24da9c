use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::models::{NewNote, Note};
use crate::database::pagination::PageRequest;
use crate::database::store::{NoteStore, StoreError};

/// Process-local note store. Ids start at 1 and are never reused.
pub struct MemoryNoteStore {
    notes: RwLock<BTreeMap<i64, Note>>,
    next_id: AtomicI64,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self {
            notes: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Seed with notes that already carry ids. The id counter moves past the highest one.
    pub fn with_notes(notes: impl IntoIterator<Item = Note>) -> Self {
        let notes: BTreeMap<i64, Note> = notes.into_iter().map(|n| (n.id, n)).collect();
        let next = notes.keys().next_back().map_or(1, |max| max + 1);
        Self {
            notes: RwLock::new(notes),
            next_id: AtomicI64::new(next),
        }
    }

    pub async fn len(&self) -> usize {
        self.notes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.notes.read().await.is_empty()
    }
}

impl Default for MemoryNoteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn create(&self, note: NewNote) -> Result<Note, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = Note {
            id,
            title: note.title,
            content: note.content,
            owner: note.owner,
        };
        self.notes.write().await.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id_and_owner(&self, id: i64, owner: &str) -> Result<Option<Note>, StoreError> {
        let notes = self.notes.read().await;
        Ok(notes.get(&id).filter(|n| n.owner == owner).cloned())
    }

    async fn exists_by_id_and_owner(&self, id: i64, owner: &str) -> Result<bool, StoreError> {
        let notes = self.notes.read().await;
        Ok(notes.get(&id).is_some_and(|n| n.owner == owner))
    }

    async fn list_by_owner(&self, owner: &str, page: &PageRequest) -> Result<Vec<Note>, StoreError> {
        let mut owned: Vec<Note> = {
            let notes = self.notes.read().await;
            notes.values().filter(|n| n.owner == owner).cloned().collect()
        };
        owned.sort_by(|a, b| page.compare(a, b));

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        Ok(owned
            .into_iter()
            .skip(offset)
            .take(page.size as usize)
            .collect())
    }

    async fn update(&self, note: &Note) -> Result<(), StoreError> {
        let mut notes = self.notes.write().await;
        match notes.get_mut(&note.id) {
            Some(existing) => {
                *existing = note.clone();
                Ok(())
            }
            None => Err(StoreError::Missing(note.id)),
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        self.notes.write().await.remove(&id);
        Ok(())
    }
}
