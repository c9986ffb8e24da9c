use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, RawQuery, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};

use crate::app::AppState;
use crate::auth::Principal;
use crate::database::models::{Note, NotePayload};
use crate::database::PageRequest;
use crate::error::ApiError;

fn note_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|e| ApiError::bad_request(e.body_text()))
}

fn note_body(body: Result<Json<NotePayload>, JsonRejection>) -> Result<NotePayload, ApiError> {
    body.map(|Json(payload)| payload)
        .map_err(|e| ApiError::invalid_json(e.body_text()))
}

/// GET /notes/:id - one of the caller's notes
#[utoipa::path(
    get,
    path = "/notes/{id}",
    tag = "Notes",
    params(("id" = i64, Path, description = "Note id")),
    responses(
        (status = 200, description = "The note", body = Note),
        (status = 404, description = "No such note for this caller")
    ),
    security(("basic_auth" = []))
)]
pub async fn find_by_id(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Note>, ApiError> {
    let id = note_id(path)?;
    let note = state.notes.find(id, &principal).await?;
    Ok(Json(note))
}

/// GET /notes?page&size&sort - a page of the caller's notes
#[utoipa::path(
    get,
    path = "/notes",
    tag = "Notes",
    params(
        ("page" = Option<u32>, Query, description = "Zero-based page index, default 0"),
        ("size" = Option<u32>, Query, description = "Page size, default 20"),
        ("sort" = Option<String>, Query, description = "field[,asc|desc], repeatable; default id,desc")
    ),
    responses(
        (status = 200, description = "Notes on the requested page", body = [Note]),
        (status = 400, description = "Unknown sort property")
    ),
    security(("basic_auth" = []))
)]
pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<Note>>, ApiError> {
    let page = PageRequest::from_query(query.as_deref())?;
    let notes = state.notes.list(&principal, &page).await?;
    Ok(Json(notes))
}

/// POST /notes - create a note owned by the caller
#[utoipa::path(
    post,
    path = "/notes",
    tag = "Notes",
    request_body = NotePayload,
    responses(
        (status = 201, description = "Created; Location points at the new note"),
        (status = 400, description = "Invalid title, content, or owner length")
    ),
    security(("basic_auth" = []))
)]
pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    body: Result<Json<NotePayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = note_body(body)?;
    let note = state.notes.create(payload, &principal).await?;

    let location = format!("{}/notes/{}", state.base_path, note.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)]))
}

/// PUT /notes/:id - replace title and content of one of the caller's notes
#[utoipa::path(
    put,
    path = "/notes/{id}",
    tag = "Notes",
    params(("id" = i64, Path, description = "Note id")),
    request_body = NotePayload,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Invalid title, content, or owner length"),
        (status = 404, description = "No such note for this caller")
    ),
    security(("basic_auth" = []))
)]
pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<NotePayload>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let id = note_id(path)?;
    let payload = note_body(body)?;
    state.notes.update(id, payload, &principal).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /notes/:id
#[utoipa::path(
    delete,
    path = "/notes/{id}",
    tag = "Notes",
    params(("id" = i64, Path, description = "Note id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such note for this caller")
    ),
    security(("basic_auth" = []))
)]
pub async fn delete(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = note_id(path)?;
    state.notes.delete(id, &principal).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::config::NoteLimits;
    use crate::testing::{TestClient, HANK, KUMAR, SARAH};
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    fn ids(body: &Value) -> Vec<i64> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|n| n["id"].as_i64().unwrap())
            .collect()
    }

    fn titles(body: &Value) -> Vec<String> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|n| n["title"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn should_return_a_note_when_data_is_saved() {
        let client = TestClient::new();
        let response = client.get_as(SARAH, "/notes/99").await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(
            response.json(),
            json!({
                "id": 99,
                "title": "This is a title",
                "content": "This is a note",
                "owner": "sarah1"
            })
        );
    }

    #[tokio::test]
    async fn should_not_return_a_note_with_an_unknown_id() {
        let client = TestClient::new();
        let response = client.get_as(SARAH, "/notes/1000").await;

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert!(response.body.is_empty());
    }

    #[tokio::test]
    async fn should_not_reveal_notes_owned_by_others() {
        let client = TestClient::new();
        let foreign = client.get_as(SARAH, "/notes/102").await;
        let missing = client.get_as(SARAH, "/notes/1000").await;

        assert_eq!(foreign.status, StatusCode::NOT_FOUND);
        assert_eq!(foreign.status, missing.status);
        assert_eq!(foreign.body, missing.body);
    }

    #[tokio::test]
    async fn non_numeric_id_is_bad_request() {
        let client = TestClient::new();
        let response = client.get_as(SARAH, "/notes/abc").await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_create_a_new_note() {
        let client = TestClient::new();
        let response = client
            .send(
                "POST",
                "/notes",
                Some(SARAH),
                Some(json!({
                    "id": null,
                    "title": "This is created note",
                    "content": "This is created content",
                    "owner": "sarah1"
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        assert!(response.body.is_empty());

        let location = response.location().expect("Location header");
        assert!(location.starts_with("/notes/"));

        let fetched = client.get_as(SARAH, &location).await;
        assert_eq!(fetched.status, StatusCode::OK);
        let body = fetched.json();
        assert!(body["id"].is_i64());
        assert_eq!(format!("/notes/{}", body["id"]), location);
        assert_eq!(body["title"], "This is created note");
        assert_eq!(body["content"], "This is created content");
        assert_eq!(body["owner"], "sarah1");
    }

    #[tokio::test]
    async fn create_ignores_client_supplied_owner() {
        let client = TestClient::new();
        let response = client
            .send(
                "POST",
                "/notes",
                Some(SARAH),
                Some(json!({"title": "Sneaky", "content": "Pretend to be kumar", "owner": "kumar2"})),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        let location = response.location().unwrap();

        let as_sarah = client.get_as(SARAH, &location).await;
        assert_eq!(as_sarah.json()["owner"], "sarah1");

        let as_kumar = client.get_as(KUMAR, &location).await;
        assert_eq!(as_kumar.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_rejects_invalid_notes() {
        let client = TestClient::new();
        for body in [
            json!({"title": "t".repeat(31), "content": "c"}),
            json!({"title": "t", "content": "c".repeat(1001)}),
            json!({"title": "", "content": "c"}),
            json!({"title": "t", "content": ""}),
            json!({"content": "no title"}),
        ] {
            let response = client.send("POST", "/notes", Some(SARAH), Some(body.clone())).await;
            assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", body);
            assert!(response.body.is_empty());
        }

        let list = client.get_as(SARAH, "/notes").await;
        assert_eq!(ids(&list.json()).len(), 3);
    }

    #[tokio::test]
    async fn create_rejects_malformed_json() {
        let client = TestClient::new();
        let response = client
            .send_raw("POST", "/notes", Some(SARAH), Some("{not json".to_string()))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert!(response.body.is_empty());
    }

    #[tokio::test]
    async fn extended_limits_accept_longer_notes() {
        let client = TestClient::with_limits(NoteLimits::EXTENDED);
        let response = client
            .send(
                "POST",
                "/notes",
                Some(SARAH),
                Some(json!({"title": "t".repeat(50), "content": "c".repeat(20000)})),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn should_return_all_notes_when_list_is_requested() {
        let client = TestClient::new();
        let response = client.get_as(SARAH, "/notes").await;
        assert_eq!(response.status, StatusCode::OK);

        let body = response.json();
        let mut found = ids(&body);
        found.sort_unstable();
        assert_eq!(found, vec![99, 100, 101]);
        assert!(body.as_array().unwrap().iter().all(|n| n["owner"] == "sarah1"));
    }

    #[tokio::test]
    async fn should_return_a_page_of_notes() {
        let client = TestClient::new();
        let response = client.get_as(SARAH, "/notes?page=0&size=1").await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(ids(&response.json()).len(), 1);
    }

    #[tokio::test]
    async fn should_return_a_sorted_page_of_notes() {
        let client = TestClient::new();
        let response = client.get_as(SARAH, "/notes?page=0&size=1&sort=id,desc").await;
        assert_eq!(response.status, StatusCode::OK);

        let body = response.json();
        assert_eq!(ids(&body), vec![101]);
        assert_eq!(body[0]["title"], "Another title");
        assert_eq!(body[0]["content"], "Another note");
    }

    #[tokio::test]
    async fn default_sort_is_id_descending() {
        let client = TestClient::new();
        let body = client.get_as(SARAH, "/notes").await.json();
        assert_eq!(titles(&body), vec!["Another title", "Second title", "This is a title"]);
    }

    #[tokio::test]
    async fn sorts_by_title_ascending() {
        let client = TestClient::new();
        let body = client.get_as(SARAH, "/notes?sort=title,asc").await.json();
        assert_eq!(titles(&body), vec!["Another title", "Second title", "This is a title"]);
        assert_eq!(ids(&body), vec![101, 100, 99]);

        let body = client.get_as(SARAH, "/notes?sort=title,desc").await.json();
        assert_eq!(ids(&body), vec![99, 100, 101]);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let client = TestClient::new();
        let response = client.get_as(SARAH, "/notes?page=5&size=20").await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json(), json!([]));
    }

    #[tokio::test]
    async fn unknown_sort_property_is_bad_request() {
        let client = TestClient::new();
        let response = client.get_as(SARAH, "/notes?sort=password,asc").await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn default_page_size_is_twenty() {
        let client = TestClient::new();
        for i in 0..25 {
            let response = client
                .send(
                    "POST",
                    "/notes",
                    Some(KUMAR),
                    Some(json!({"title": format!("bulk {}", i), "content": "c"})),
                )
                .await;
            assert_eq!(response.status, StatusCode::CREATED);
        }

        let body = client.get_as(KUMAR, "/notes").await.json();
        let page = ids(&body);
        assert_eq!(page.len(), 20);
        assert!(page.windows(2).all(|w| w[0] > w[1]));
        assert!(!page.contains(&99));
    }

    #[tokio::test]
    async fn should_update_an_existing_note() {
        let client = TestClient::new();
        let response = client
            .send(
                "PUT",
                "/notes/99",
                Some(SARAH),
                Some(json!({"id": 5000, "title": "Updated title", "content": "Updated note", "owner": "kumar2"})),
            )
            .await;
        assert_eq!(response.status, StatusCode::NO_CONTENT);
        assert!(response.body.is_empty());

        let fetched = client.get_as(SARAH, "/notes/99").await;
        assert_eq!(
            fetched.json(),
            json!({
                "id": 99,
                "title": "Updated title",
                "content": "Updated note",
                "owner": "sarah1"
            })
        );
        assert_eq!(client.get_as(SARAH, "/notes/5000").await.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_not_update_a_note_that_does_not_exist() {
        let client = TestClient::new();
        let response = client
            .send(
                "PUT",
                "/notes/99999",
                Some(SARAH),
                Some(json!({"title": "Ghost", "content": "Nothing here"})),
            )
            .await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_not_update_a_note_owned_by_someone_else() {
        let client = TestClient::new();
        let response = client
            .send(
                "PUT",
                "/notes/102",
                Some(SARAH),
                Some(json!({"title": "Hijacked", "content": "Mine now"})),
            )
            .await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);

        let fetched = client.get_as(KUMAR, "/notes/102").await;
        assert_eq!(fetched.json()["title"], "Kumar's title");
    }

    #[tokio::test]
    async fn update_with_invalid_body_is_bad_request() {
        let client = TestClient::new();
        let response = client
            .send(
                "PUT",
                "/notes/99",
                Some(SARAH),
                Some(json!({"title": "t".repeat(31), "content": "c"})),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(client.get_as(SARAH, "/notes/99").await.json()["title"], "This is a title");
    }

    #[tokio::test]
    async fn should_delete_an_existing_note() {
        let client = TestClient::new();
        let response = client.send("DELETE", "/notes/99", Some(SARAH), None).await;
        assert_eq!(response.status, StatusCode::NO_CONTENT);

        let fetched = client.get_as(SARAH, "/notes/99").await;
        assert_eq!(fetched.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_not_delete_a_note_that_does_not_exist() {
        let client = TestClient::new();
        let response = client.send("DELETE", "/notes/99999", Some(SARAH), None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_not_delete_a_note_owned_by_someone_else() {
        let client = TestClient::new();
        let response = client.send("DELETE", "/notes/102", Some(SARAH), None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);

        assert_eq!(client.get_as(KUMAR, "/notes/102").await.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn locked_user_cannot_reach_notes() {
        let client = TestClient::new();
        let response = client.get_as(HANK, "/notes/99").await;
        assert_eq!(response.status, StatusCode::FORBIDDEN);
    }
}
