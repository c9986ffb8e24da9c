//! Test fixtures: static users, seeded notes, and an in-process HTTP client.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::app::{app, AppState};
use crate::auth::basic::encode_basic_auth;
use crate::auth::{AuthError, CredentialProvider, Principal, NOTES_USER};
use crate::config::NoteLimits;
use crate::database::{MemoryNoteStore, Note};

pub const SARAH: (&str, &str) = ("sarah1", "abc123");
pub const KUMAR: (&str, &str) = ("kumar2", "xyz789");
pub const HANK: (&str, &str) = ("hank-cant-note", "qrs456");

/// Plaintext username/password table. Never use outside tests.
pub struct StaticCredentials {
    users: HashMap<String, (String, Principal)>,
}

impl StaticCredentials {
    pub fn fixtures() -> Self {
        let mut users = HashMap::new();
        for ((name, password), role) in [
            (SARAH, NOTES_USER),
            (HANK, "LOCKED-USER"),
            (KUMAR, NOTES_USER),
        ] {
            users.insert(
                name.to_string(),
                (password.to_string(), Principal::new(name, [role])),
            );
        }
        Self { users }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentials {
    async fn authenticate(&self, username: &str, password: &str) -> Result<Option<Principal>, AuthError> {
        Ok(self
            .users
            .get(username)
            .filter(|(expected, _)| expected == password)
            .map(|(_, principal)| principal.clone()))
    }
}

fn note(id: i64, title: &str, content: &str, owner: &str) -> Note {
    Note {
        id,
        title: title.to_string(),
        content: content.to_string(),
        owner: owner.to_string(),
    }
}

/// Notes 99-101 belong to sarah1, 102 to kumar2.
pub fn seeded_store() -> MemoryNoteStore {
    MemoryNoteStore::with_notes(vec![
        note(99, "This is a title", "This is a note", "sarah1"),
        note(100, "Second title", "Second note", "sarah1"),
        note(101, "Another title", "Another note", "sarah1"),
        note(102, "Kumar's title", "Kumar's note", "kumar2"),
    ])
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    pub fn location(&self) -> Option<String> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

pub struct TestClient {
    router: Router,
}

impl TestClient {
    pub fn new() -> Self {
        Self::with_base_path("")
    }

    pub fn with_base_path(base_path: &str) -> Self {
        Self::build(base_path, NoteLimits::STRICT)
    }

    pub fn with_limits(limits: NoteLimits) -> Self {
        Self::build("", limits)
    }

    fn build(base_path: &str, limits: NoteLimits) -> Self {
        let state = AppState::new(
            Arc::new(seeded_store()),
            Arc::new(StaticCredentials::fixtures()),
            limits,
            base_path,
        );
        let origins = vec!["http://localhost:3000".to_string()];
        Self {
            router: app(state, &origins),
        }
    }

    async fn dispatch(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        TestResponse { status, headers, body }
    }

    pub async fn send_raw(
        &self,
        method: &str,
        uri: &str,
        credentials: Option<(&str, &str)>,
        body: Option<String>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some((user, password)) = credentials {
            builder = builder.header(header::AUTHORIZATION, encode_basic_auth(user, password));
        }
        let body = match body {
            Some(text) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(text)
            }
            None => Body::empty(),
        };
        self.dispatch(builder.body(body).unwrap()).await
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        credentials: Option<(&str, &str)>,
        body: Option<Value>,
    ) -> TestResponse {
        self.send_raw(method, uri, credentials, body.map(|v| v.to_string()))
            .await
    }

    pub async fn get_as(&self, credentials: (&str, &str), uri: &str) -> TestResponse {
        self.send("GET", uri, Some(credentials), None).await
    }

    pub async fn preflight(&self, uri: &str, origin: &str, method: &str) -> TestResponse {
        let request = Request::builder()
            .method("OPTIONS")
            .uri(uri)
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, method)
            .body(Body::empty())
            .unwrap();
        self.dispatch(request).await
    }

    pub async fn send_with_origin(
        &self,
        method: &str,
        uri: &str,
        (user, password): (&str, &str),
        origin: &str,
    ) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::ORIGIN, origin)
            .header(header::AUTHORIZATION, encode_basic_auth(user, password))
            .body(Body::empty())
            .unwrap();
        self.dispatch(request).await
    }
}
