//! Route definitions for both APIs
//!
//! This module configures all HTTP routes and maps them to their respective
//! handlers. The two services have disjoint path spaces, so their routers
//! are built separately and merged into one app.

use axum::routing::{get, post};
use axum::Router;

use crate::database::AppState;
use crate::exercise::{create_exercise, create_user, exercise_log, list_users};
use crate::shorturl::{resolve_short_url, shorten_url};

/// Exercise tracker routes
///
/// - `GET /api/users` - list users
/// - `POST /api/users` - create a user
/// - `POST /api/users/{id}/exercises` - log an exercise
/// - `GET /api/users/{id}/logs` - a user's exercise log
pub fn exercise_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/{id}/exercises", post(create_exercise))
        .route("/api/users/{id}/logs", get(exercise_log))
}

/// URL shortener routes
///
/// - `POST /api/shorturl` - shorten a URL
/// - `GET /api/shorturl/{code}` - redirect to the original URL
pub fn shorturl_routes() -> Router<AppState> {
    Router::new()
        .route("/api/shorturl", post(shorten_url))
        .route("/api/shorturl/{code}", get(resolve_short_url))
}

/// Creates the merged application router with the shared state injected
///
/// # Example Usage
///
/// ```no_run
/// # use std::sync::Arc;
/// # use fitlink::database::{init_db, AppState};
/// # use fitlink::route::create_app;
/// # let db = init_db("data.db").unwrap();
/// let state = AppState { db: Arc::new(db) };
/// let app = create_app(state);
/// // axum::serve(listener, app).await.unwrap();
/// ```
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(exercise_routes())
        .merge(shorturl_routes())
        .with_state(state)
}
