pub mod note;
pub mod user;

pub use note::{NewNote, Note, NotePayload};
pub use user::UserRecord;
