//! Integration tests for the exercise tracker API
//!
//! These tests drive the real router against a temporary database and
//! verify routing, validation, storage and response shaping.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tower::ServiceExt;

use fitlink::database::{init_db, AppState};
use fitlink::route::create_app;

/// Helper function to create a test application with a temporary database
fn setup_test_app() -> (axum::Router, NamedTempFile) {
    let temp_db = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = temp_db.path().to_str().unwrap();

    let db = init_db(db_path).expect("Failed to initialize test database");
    let state = AppState { db: Arc::new(db) };

    (create_app(state), temp_db)
}

/// Helper function to parse response body as JSON
async fn response_json(body: Body) -> Value {
    let bytes = body
        .collect()
        .await
        .expect("Failed to read response body")
        .to_bytes();

    serde_json::from_slice(&bytes).expect("Failed to parse JSON")
}

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Creates a user and returns its generated id
async fn create_user(app: &axum::Router, username: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json("/api/users", &json!({ "username": username })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response.into_body()).await;
    body["_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_create_user_and_list() {
    let (app, _temp_db) = setup_test_app();

    let response = app
        .clone()
        .oneshot(post_json("/api/users", &json!({ "username": "bob" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response.into_body()).await;
    assert_eq!(body["username"], "bob");
    assert!(!body["_id"].as_str().unwrap().is_empty());

    let response = app.oneshot(get("/api/users")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response.into_body()).await;
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "bob");
}

#[tokio::test]
async fn test_create_user_missing_username() {
    let (app, _temp_db) = setup_test_app();

    let response = app
        .clone()
        .oneshot(post_json("/api/users", &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Empty usernames are rejected the same way
    let response = app
        .oneshot(post_json("/api/users", &json!({ "username": "" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_exercise_unknown_user() {
    let (app, _temp_db) = setup_test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/users/deadbeef00000000deadbeef/exercises",
            &json!({ "description": "run", "duration": 30 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Nothing was stored
    let response = app.oneshot(get("/api/users")).await.unwrap();
    let body = response_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_exercise_non_numeric_duration() {
    let (app, _temp_db) = setup_test_app();
    let user_id = create_user(&app, "alice").await;

    let response = app
        .oneshot(post_json(
            &format!("/api/users/{}/exercises", user_id),
            &json!({ "description": "run", "duration": "abc" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("duration"));
}

#[tokio::test]
async fn test_create_exercise_coerces_string_duration() {
    let (app, _temp_db) = setup_test_app();
    let user_id = create_user(&app, "alice").await;

    let response = app
        .oneshot(post_json(
            &format!("/api/users/{}/exercises", user_id),
            &json!({ "description": "run", "duration": "30", "date": "2024-01-01" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response.into_body()).await;
    assert_eq!(body["duration"], 30);
    assert_eq!(body["date"], "Mon Jan 01 2024");
    assert_eq!(body["description"], "run");
    assert_eq!(body["username"], "alice");
    assert_eq!(body["_id"].as_str().unwrap(), user_id);
}

#[tokio::test]
async fn test_create_exercise_missing_description() {
    let (app, _temp_db) = setup_test_app();
    let user_id = create_user(&app, "alice").await;

    let response = app
        .oneshot(post_json(
            &format!("/api/users/{}/exercises", user_id),
            &json!({ "duration": 30 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_exercise_invalid_date() {
    let (app, _temp_db) = setup_test_app();
    let user_id = create_user(&app, "alice").await;

    let response = app
        .oneshot(post_json(
            &format!("/api/users/{}/exercises", user_id),
            &json!({ "description": "run", "duration": 30, "date": "garbage" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_exercise_defaults_date_to_today() {
    let (app, _temp_db) = setup_test_app();
    let user_id = create_user(&app, "alice").await;

    let response = app
        .oneshot(post_json(
            &format!("/api/users/{}/exercises", user_id),
            &json!({ "description": "run", "duration": 30 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response.into_body()).await;

    let today = chrono::Utc::now().format("%a %b %d %Y").to_string();
    assert_eq!(body["date"], today);
}

#[tokio::test]
async fn test_logs_unknown_user() {
    let (app, _temp_db) = setup_test_app();

    let response = app
        .oneshot(get("/api/users/deadbeef00000000deadbeef/logs"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_logs_filtering_and_limit() {
    let (app, _temp_db) = setup_test_app();
    let user_id = create_user(&app, "runner").await;

    for date in [
        "2023-01-01",
        "2023-03-10",
        "2023-06-15",
        "2023-12-31",
        "2024-02-01",
    ] {
        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/api/users/{}/exercises", user_id),
                &json!({ "description": "run", "duration": 10, "date": date }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Bounds are strict: the exercises on the bounds themselves are excluded
    let response = app
        .clone()
        .oneshot(get(&format!(
            "/api/users/{}/logs?from=2023-01-01&to=2023-12-31&limit=2",
            user_id
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response.into_body()).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["username"], "runner");

    let log = body["log"].as_array().unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0]["date"], "Fri Mar 10 2023");
    assert_eq!(log[1]["date"], "Thu Jun 15 2023");

    // Log entries carry only the exercise's own fields
    assert!(log[0].get("_id").is_none());
    assert!(log[0].get("user_id").is_none());

    // Without filters the full log comes back in creation order
    let response = app
        .oneshot(get(&format!("/api/users/{}/logs", user_id)))
        .await
        .unwrap();
    let body = response_json(response.into_body()).await;
    assert_eq!(body["count"], 5);
    assert_eq!(body["log"][0]["date"], "Sun Jan 01 2023");
}

#[tokio::test]
async fn test_logs_non_numeric_limit_is_ignored() {
    let (app, _temp_db) = setup_test_app();
    let user_id = create_user(&app, "runner").await;

    for date in ["2023-01-01", "2023-03-10"] {
        app.clone()
            .oneshot(post_json(
                &format!("/api/users/{}/exercises", user_id),
                &json!({ "description": "run", "duration": 10, "date": date }),
            ))
            .await
            .unwrap();
    }

    let response = app
        .oneshot(get(&format!("/api/users/{}/logs?limit=abc", user_id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response.into_body()).await;
    assert_eq!(body["count"], 2);
}
