use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::Principal;
use crate::error::ApiError;

/// Role a route group demands, carried as middleware state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredRole(pub &'static str);

/// Middleware that rejects principals lacking the route's required role with 403.
///
/// Must run after `authenticate`; a request without a principal is treated as
/// unauthenticated.
pub async fn require_role(
    State(RequiredRole(role)): State<RequiredRole>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = request
        .extensions()
        .get::<Principal>()
        .ok_or_else(|| ApiError::unauthorized("Authentication required before role check"))?;

    if !principal.has_role(role) {
        tracing::warn!("'{}' lacks role {} for {}", principal.name, role, request.uri().path());
        return Err(ApiError::forbidden(format!("Role {} required", role)));
    }

    Ok(next.run(request).await)
}
