use sqlx::FromRow;

/// Row of the `users` table backing HTTP basic authentication.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub username: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub roles: Vec<String>,
}
