use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A stored note. `id` is assigned by the store and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub owner: String,
}

/// A note that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub owner: String,
}

/// Inbound JSON body for create and update.
///
/// `id` and `owner` are accepted so clients can round-trip a fetched note,
/// but both are ignored: the server assigns the id and stamps the owner from
/// the authenticated principal.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct NotePayload {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub owner: Option<String>,
}
