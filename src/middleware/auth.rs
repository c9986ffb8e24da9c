use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{parse_basic_auth, CredentialProvider};
use crate::error::ApiError;

/// Basic authentication middleware that resolves the caller's principal
///
/// Missing, malformed, or wrong credentials yield 401. On success the
/// `Principal` is inserted into request extensions for the handlers.
pub async fn authenticate(
    State(credentials): State<Arc<dyn CredentialProvider>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let basic = parse_basic_auth(request.headers())?;

    let principal = credentials
        .authenticate(&basic.username, &basic.password)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Authentication failed for user '{}'", basic.username);
            ApiError::unauthorized("Bad credentials")
        })?;

    tracing::debug!("Authenticated '{}' with roles {:?}", principal.name, principal.roles);
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}
