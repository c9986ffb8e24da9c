//! Authentication boundary: who is calling, and which roles they hold.
//!
//! Credentials arrive as HTTP basic auth and are checked by a
//! [`CredentialProvider`]. The resolved [`Principal`] is threaded into
//! handlers through request extensions.

pub mod basic;
pub mod postgres;

use std::collections::BTreeSet;

use async_trait::async_trait;
use thiserror::Error;

pub use basic::{parse_basic_auth, BasicAuthError, BasicCredentials};
pub use postgres::{hash_password, verify_password, PgCredentialProvider};

/// Realm advertised in `WWW-Authenticate` challenges.
pub const REALM: &str = "notes";

/// Role required for every note route and `/login`.
pub const NOTES_USER: &str = "NOTES-USER";

/// The authenticated identity making a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub name: String,
    pub roles: BTreeSet<String>,
}

impl Principal {
    pub fn new<I, S>(name: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("password hash error: {0}")]
    Hash(String),

    #[error("credential check did not complete: {0}")]
    Task(String),
}

/// Verifies a username/password pair and yields the caller's identity.
///
/// `Ok(None)` means the credentials were wrong or the user is unknown; the
/// two cases are not distinguished.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn authenticate(&self, username: &str, password: &str) -> Result<Option<Principal>, AuthError>;
}
