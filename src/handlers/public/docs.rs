use axum::Json;
use utoipa::OpenApi;

use crate::api::docs::ApiDoc;

/// GET /v3/api-docs - OpenAPI document for the note routes
pub async fn api_docs() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
