//! HTTP request handlers for the URL shortener API
//!
//! This module implements:
//! - Shortening a URL to the next sequential code
//! - Redirecting a code back to its original destination
//!
//! Codes start at 1 and are never reused; `original_url` is unique, enforced
//! by a reverse index checked inside the same write transaction that inserts.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use redb::{ReadableDatabase, ReadableTable};
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

use crate::database::{next_seq, AppState, SHORT_URL_SEQ, TABLE_URLS, TABLE_URL_INDEX};
use crate::error::ApiError;
use crate::model::{ShortenRequest, ShortenResponse};

/// Permissive scheme+host pattern the service has always accepted.
/// Deliberately unanchored, matching the legacy check.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(ftp|http|https)://(\w+:?\w*@)?(\S+)(:[0-9]+)?(/|/([\w#!:.?+=&%@!\-/]))?")
        .expect("url pattern compiles")
});

/// Shortens a URL
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/very/long/url" }
/// ```
///
/// # Response
///
/// - **200 OK** - `{original_url, short_url}` with the assigned code
/// - **200 OK** with `{"error":"invalid url"}` - format check failed; the
///   legacy API answered this with a 200 and callers depend on it
/// - **400 Bad Request** - URL was already submitted
/// - **500 Internal Server Error** - storage failure
pub async fn shorten_url(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<Response, ApiError> {
    let url = match payload.url.filter(|u| URL_PATTERN.is_match(u)) {
        Some(url) => url,
        None => return Ok(Json(json!({ "error": "invalid url" })).into_response()),
    };

    let write_txn = state.db.begin_write()?;
    let code;
    {
        let mut index = write_txn.open_table(TABLE_URL_INDEX)?;
        if index.get(url.as_str())?.is_some() {
            return Err(ApiError::Conflict("URL already submitted".to_string()));
        }

        // Counter bump and both inserts commit atomically, so codes stay
        // strictly increasing with no reuse even under concurrent writers.
        code = next_seq(&write_txn, SHORT_URL_SEQ)?;
        index.insert(url.as_str(), code)?;

        let mut urls = write_txn.open_table(TABLE_URLS)?;
        urls.insert(code, url.as_str())?;
    }
    write_txn.commit()?;

    Ok(Json(ShortenResponse {
        original_url: url,
        short_url: code,
    })
    .into_response())
}

/// Redirects a short code to its original destination
///
/// The code is parsed here rather than typed in the route so a non-numeric
/// value yields this endpoint's own 400 body.
///
/// # Response
///
/// - **302 Found** - `Location` header set to the original URL
/// - **400 Bad Request** - code is not a number
/// - **404 Not Found** - no record with that code
pub async fn resolve_short_url(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let code: u64 = code
        .parse()
        .map_err(|_| ApiError::Validation("Bad format".to_string()))?;

    let read_txn = state.db.begin_read()?;
    let table = read_txn.open_table(TABLE_URLS)?;

    match table.get(code)? {
        Some(guard) => {
            let original_url = guard.value().to_string();
            Ok((StatusCode::FOUND, [(header::LOCATION, original_url)]).into_response())
        }
        None => Err(ApiError::NotFound("Url not found".to_string())),
    }
}
