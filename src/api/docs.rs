use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::database::models::{Note, NotePayload};
use crate::handlers::protected::{login, notes};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Simple Notes API",
        description = "Owner-scoped CRUD for short text notes"
    ),
    paths(
        notes::find_by_id,
        notes::list,
        notes::create,
        notes::update,
        notes::delete,
        login::login
    ),
    components(schemas(Note, NotePayload)),
    modifiers(&BasicAuthScheme),
    tags(
        (name = "Notes", description = "Note CRUD scoped to the caller"),
        (name = "Auth", description = "Credential probe")
    )
)]
pub struct ApiDoc;

struct BasicAuthScheme;

impl Modify for BasicAuthScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
            );
        }
    }
}
