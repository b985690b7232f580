//! Error taxonomy and the mapping to HTTP responses
//!
//! Handlers return `Result<_, ApiError>`; every storage error converts via
//! `From` so `?` works directly on redb calls. The `IntoResponse` impl is
//! the single place status codes and error bodies are decided: validation
//! and conflict map to 400, missing records to 404, and anything unexpected
//! to a logged 500 with a generic body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed required field
    #[error("{0}")]
    Validation(String),

    /// Referenced id or code has no record
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness violation
    #[error("{0}")]
    Conflict(String),

    /// Unexpected store failure
    #[error(transparent)]
    Storage(#[from] redb::Error),

    /// Record (de)serialization failure
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.as_str()),
            ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            ApiError::Storage(err) => {
                tracing::error!(error = %err, "storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            ApiError::Serialize(err) => {
                tracing::error!(error = %err, "record serialization failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

// redb surfaces a distinct error type per operation; funnel them all into
// the aggregate error so handlers can use `?` uniformly.
impl From<redb::TransactionError> for ApiError {
    fn from(err: redb::TransactionError) -> Self {
        ApiError::Storage(err.into())
    }
}

impl From<redb::TableError> for ApiError {
    fn from(err: redb::TableError) -> Self {
        ApiError::Storage(err.into())
    }
}

impl From<redb::StorageError> for ApiError {
    fn from(err: redb::StorageError) -> Self {
        ApiError::Storage(err.into())
    }
}

impl From<redb::CommitError> for ApiError {
    fn from(err: redb::CommitError) -> Self {
        ApiError::Storage(err.into())
    }
}
