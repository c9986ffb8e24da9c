use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{CredentialProvider, NOTES_USER};
use crate::config::NoteLimits;
use crate::database::NoteStore;
use crate::handlers::{protected, public};
use crate::middleware::{authenticate, require_role, RequiredRole};
use crate::services::NoteService;

/// Shared, cheaply clonable request state.
#[derive(Clone)]
pub struct AppState {
    pub notes: NoteService,
    pub credentials: Arc<dyn CredentialProvider>,
    /// Prefix used when building `Location` headers, e.g. `/api`.
    pub base_path: String,
}

impl AppState {
    pub fn new(
        store: Arc<dyn NoteStore>,
        credentials: Arc<dyn CredentialProvider>,
        limits: NoteLimits,
        base_path: impl Into<String>,
    ) -> Self {
        Self {
            notes: NoteService::new(store, limits),
            credentials,
            base_path: base_path.into(),
        }
    }
}

pub fn app(state: AppState, cors_origins: &[String]) -> Router {
    let routes = Router::new()
        .merge(public_routes())
        .merge(protected_routes(&state))
        .with_state(state.clone());

    let routes = if state.base_path.is_empty() {
        routes
    } else {
        Router::new().nest(&state.base_path, routes)
    };

    routes
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(public::health))
        .route("/v3/api-docs", get(public::api_docs))
}

fn protected_routes(state: &AppState) -> Router<AppState> {
    use protected::notes;

    // Layers run bottom-up: authenticate, then the role check, then the handler.
    Router::new()
        .route("/notes", get(notes::list).post(notes::create))
        .route(
            "/notes/:id",
            get(notes::find_by_id).put(notes::update).delete(notes::delete),
        )
        .route("/login", get(protected::login))
        .route_layer(middleware::from_fn_with_state(
            RequiredRole(NOTES_USER),
            require_role,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.credentials.clone(),
            authenticate,
        ))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .expose_headers([header::LOCATION])
}
