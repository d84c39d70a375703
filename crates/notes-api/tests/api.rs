//! End-to-end tests driving the router request by request.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use notes_api::config::Config;
use notes_api::storage::Storage;
use notes_api::{app, AppState};
use notes_core::TokenService;

const SECRET: &str = "test-secret";

fn test_app(dir: &tempfile::TempDir) -> Router {
    let storage = Storage::new(dir.path().to_str().unwrap()).unwrap();
    let state = Arc::new(AppState {
        config: Config::default(),
        storage,
        tokens: TokenService::new(SECRET, 3600),
    });
    app(state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn signup(app: &Router, name: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/user/signup",
        None,
        Some(json!({ "name": name, "password": password })),
    )
    .await
}

async fn login_token(app: &Router, name: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/user/login",
        None,
        Some(json!({ "name": name, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

async fn create_note(app: &Router, token: &str, title: &str, text: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/notes",
        Some(token),
        Some(json!({ "title": title, "text": text })),
    )
    .await
}

#[tokio::test]
async fn test_note_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let (status, body) = signup(&app, "alice", "pw123").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body["message"],
        "New user with name alice has been registered!"
    );
    assert!(body["user"]["password"].is_null());
    assert!(body["user"]["passwordHash"].is_null());

    let token = login_token(&app, "alice", "pw123").await;

    let (status, body) = create_note(&app, &token, "T", "hi").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "The note: T has been created and saved!");
    let note_id = body["user"]["notes"][0].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", "/notes", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["noteId"], note_id.as_str());
    assert_eq!(body[0]["title"], "T");
    assert_eq!(body[0]["text"], "hi");

    // Update with a bogus id misses
    let (status, _) = send(
        &app,
        "PUT",
        "/notes",
        Some(&token),
        Some(json!({ "noteId": "00000000-0000-0000-0000-000000000000", "title": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Real update sticks and refreshes the modified timestamp
    let (status, body) = send(
        &app,
        "PUT",
        "/notes",
        Some(&token),
        Some(json!({ "noteId": note_id, "text": "hello again" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Note \"T\" has been updated.");
    assert_eq!(body["note"]["text"], "hello again");
    let created: chrono::DateTime<chrono::Utc> =
        body["note"]["createdAt"].as_str().unwrap().parse().unwrap();
    let modified: chrono::DateTime<chrono::Utc> =
        body["note"]["modifiedAt"].as_str().unwrap().parse().unwrap();
    assert!(modified >= created);

    let (status, body) = send(
        &app,
        "DELETE",
        "/notes",
        Some(&token),
        Some(json!({ "noteId": note_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "The note: T has been deleted.");

    let (status, body) = send(&app, "GET", "/notes", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_name_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let (status, _) = signup(&app, "alice", "pw123").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = signup(&app, "alice", "other-pw").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Name already taken");

    // Case differs, so this is a different name
    let (status, _) = signup(&app, "Alice", "pw123").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_signup_missing_fields_enumerated() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let (status, body) = send(&app, "POST", "/user/signup", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Name is required; Password is required");
}

#[tokio::test]
async fn test_login_errors_are_uniform() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let (status, _) = signup(&app, "alice", "pw123").await;
    assert_eq!(status, StatusCode::CREATED);

    let (wrong_pw_status, wrong_pw_body) = send(
        &app,
        "POST",
        "/user/login",
        None,
        Some(json!({ "name": "alice", "password": "nope" })),
    )
    .await;
    let (unknown_status, unknown_body) = send(
        &app,
        "POST",
        "/user/login",
        None,
        Some(json!({ "name": "nobody", "password": "pw123" })),
    )
    .await;

    assert_eq!(wrong_pw_status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown_status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_pw_body, unknown_body);
}

#[tokio::test]
async fn test_token_rejections() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    // No header at all
    let (status, _) = send(&app, "GET", "/notes", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Signed with a foreign secret
    let foreign = TokenService::new("some-other-secret", 3600);
    let token = foreign
        .issue(&notes_core::Identity {
            user_id: uuid::Uuid::new_v4(),
            name: "mallory".to_string(),
        })
        .unwrap();
    let (status, _) = send(&app, "GET", "/notes", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Expired but correctly signed
    let stale = TokenService::new(SECRET, -60);
    let token = stale
        .issue(&notes_core::Identity {
            user_id: uuid::Uuid::new_v4(),
            name: "alice".to_string(),
        })
        .unwrap();
    let (status, body) = send(&app, "GET", "/notes", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token has expired");

    // Not a token
    let (status, _) = send(&app, "GET", "/notes", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_title_boundary() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    signup(&app, "alice", "pw123").await;
    let token = login_token(&app, "alice", "pw123").await;

    let (status, body) = create_note(&app, &token, &"a".repeat(51), "hi").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Title must be at most 50 characters long"
    );

    let (status, _) = create_note(&app, &token, &"a".repeat(50), "hi").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_missing_fields_enumerated() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    signup(&app, "alice", "pw123").await;
    let token = login_token(&app, "alice", "pw123").await;

    let (status, body) = send(&app, "POST", "/notes", Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Title is required; Text is required");
}

#[tokio::test]
async fn test_update_requires_id_and_fields() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    signup(&app, "alice", "pw123").await;
    let token = login_token(&app, "alice", "pw123").await;
    let (_, body) = create_note(&app, &token, "T", "hi").await;
    let note_id = body["user"]["notes"][0].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "PUT",
        "/notes",
        Some(&token),
        Some(json!({ "title": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "noteId is required in the request body.");

    let (status, body) = send(
        &app,
        "PUT",
        "/notes",
        Some(&token),
        Some(json!({ "noteId": note_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "At least one of title or text must be provided."
    );
}

#[tokio::test]
async fn test_cross_account_isolation() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    signup(&app, "alice", "pw123").await;
    signup(&app, "bob", "pw456").await;
    let alice = login_token(&app, "alice", "pw123").await;
    let bob = login_token(&app, "bob", "pw456").await;

    let (_, body) = create_note(&app, &alice, "Secret plans", "hi").await;
    let note_id = body["user"]["notes"][0].as_str().unwrap().to_string();

    // Bob cannot update, delete, or find Alice's note
    let (status, body) = send(
        &app,
        "PUT",
        "/notes",
        Some(&bob),
        Some(json!({ "noteId": note_id, "title": "Hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        "Note not found or does not belong to you."
    );

    let (status, body) = send(
        &app,
        "DELETE",
        "/notes",
        Some(&bob),
        Some(json!({ "noteId": note_id })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Note not found.");

    let (status, _) = send(
        &app,
        "GET",
        "/notes/search?title=Secret%20plans",
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Alice's note is untouched
    let (status, body) = send(&app, "GET", "/notes", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], "Secret plans");

    // Bob's own list never shows it either
    let (_, body) = send(&app, "GET", "/notes", Some(&bob), None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_by_title() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    signup(&app, "alice", "pw123").await;
    let token = login_token(&app, "alice", "pw123").await;
    create_note(&app, &token, "Groceries", "milk").await;

    // Case-insensitive exact match
    let (status, body) = send(
        &app,
        "GET",
        "/notes/search?title=groceries",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Groceries");

    let (status, body) = send(
        &app,
        "GET",
        "/notes/search?title=gro",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Note with that title not found.");

    let (status, body) = send(&app, "GET", "/notes/search", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Title is required in the query string.");
}
