pub mod manager;
pub mod memory;
pub mod models;
pub mod pagination;
pub mod postgres;
pub mod store;

pub use manager::DatabaseError;
pub use memory::MemoryNoteStore;
pub use models::{NewNote, Note, NotePayload};
pub use pagination::{PageRequest, PageRequestError, SortDirection, SortField, SortOrder};
pub use postgres::PgNoteStore;
pub use store::{NoteStore, StoreError};
