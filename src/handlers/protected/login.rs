use axum::http::StatusCode;

/// GET /login - succeeds only when the gate let the caller through
#[utoipa::path(
    get,
    path = "/login",
    tag = "Auth",
    responses(
        (status = 200, description = "Caller is authenticated and holds NOTES-USER"),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 403, description = "Authenticated but lacking NOTES-USER")
    ),
    security(("basic_auth" = []))
)]
pub async fn login() -> StatusCode {
    StatusCode::OK
}
