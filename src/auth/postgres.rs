use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use sqlx::PgPool;
use tracing::debug;

use super::{AuthError, CredentialProvider, Principal};
use crate::database::models::UserRecord;

/// Hash a password into an Argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Check `password` against a stored PHC string.
pub fn verify_password(password: &str, phc: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(phc).map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Stand-in hash verified for unknown usernames so they cost the same as known ones.
static UNKNOWN_USER_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("unknown-user-placeholder").ok());

/// Verify against the stored hash, or against the stand-in when there is none.
/// A missing user never matches.
fn check_password(password: &str, stored: Option<&str>) -> Result<bool, AuthError> {
    match stored {
        Some(phc) => verify_password(password, phc),
        None => {
            if let Some(phc) = UNKNOWN_USER_HASH.as_deref() {
                verify_password(password, phc)?;
            }
            Ok(false)
        }
    }
}

/// Credentials and roles stored in the `users` table.
#[derive(Clone)]
pub struct PgCredentialProvider {
    pool: PgPool,
}

impl PgCredentialProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_user(&self, username: &str) -> Result<Option<UserRecord>, AuthError> {
        let user = sqlx::query_as::<_, UserRecord>(
            "SELECT username, password_hash, roles FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Create the user or replace its password and roles.
    pub async fn upsert_user(&self, username: &str, password: &str, roles: &[String]) -> Result<(), AuthError> {
        let password_hash = hash_password(password)?;
        sqlx::query(
            "INSERT INTO users (username, password_hash, roles)
             VALUES ($1, $2, $3)
             ON CONFLICT (username)
             DO UPDATE SET password_hash = EXCLUDED.password_hash, roles = EXCLUDED.roles",
        )
        .bind(username)
        .bind(&password_hash)
        .bind(roles)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl CredentialProvider for PgCredentialProvider {
    async fn authenticate(&self, username: &str, password: &str) -> Result<Option<Principal>, AuthError> {
        let user = self.find_user(username).await?;

        // Argon2 verification is CPU-bound.
        let password = password.to_string();
        let phc = user.as_ref().map(|u| u.password_hash.clone());
        let matches = tokio::task::spawn_blocking(move || check_password(&password, phc.as_deref()))
            .await
            .map_err(|e| AuthError::Task(e.to_string()))??;

        let Some(user) = user else {
            debug!("Unknown user '{}'", username);
            return Ok(None);
        };
        if !matches {
            debug!("Password mismatch for user '{}'", username);
            return Ok(None);
        }

        Ok(Some(Principal::new(user.username, user.roles)))
    }
}
