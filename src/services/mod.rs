pub mod note_service;
pub mod validation;

pub use note_service::{NoteError, NoteService};
pub use validation::{validate_note, ValidationError};
