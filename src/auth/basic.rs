use axum::http::{header, HeaderMap};
use base64::{engine::general_purpose::STANDARD, Engine};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BasicAuthError {
    #[error("Missing Authorization header")]
    Missing,

    #[error("Authorization header must use Basic scheme")]
    UnsupportedScheme,

    #[error("Malformed Basic credentials")]
    Malformed,
}

#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

// Keep passwords out of logs.
impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Extract `username:password` from an `Authorization: Basic ...` header.
pub fn parse_basic_auth(headers: &HeaderMap) -> Result<BasicCredentials, BasicAuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(BasicAuthError::Missing)?
        .to_str()
        .map_err(|_| BasicAuthError::Malformed)?;

    let (scheme, encoded) = value
        .trim()
        .split_once(' ')
        .ok_or(BasicAuthError::UnsupportedScheme)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(BasicAuthError::UnsupportedScheme);
    }

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| BasicAuthError::Malformed)?;
    let decoded = String::from_utf8(decoded).map_err(|_| BasicAuthError::Malformed)?;

    let (username, password) = decoded.split_once(':').ok_or(BasicAuthError::Malformed)?;
    if username.is_empty() {
        return Err(BasicAuthError::Malformed);
    }

    Ok(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Build a header value for the given credentials. Used by clients and tests.
pub fn encode_basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
}
