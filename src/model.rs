//! Data models for both services
//!
//! This module defines all the data structures used throughout the
//! application: stored records, request payloads and the exact wire shapes
//! the API promises (including the `_id` field naming and the
//! "Mon Jan 01 2024" date rendering).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A registered user of the exercise tracker
///
/// Created once on POST /api/users and never mutated or deleted afterwards.
/// Exercises reference it by id.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    /// Generated opaque id, exposed on the wire as `_id`
    #[serde(rename = "_id")]
    pub id: String,

    /// Display name, required and non-empty
    pub username: String,
}

/// An exercise entry as stored in the database
///
/// Immutable after creation. The `date` keeps a full UTC timestamp; the wire
/// representation renders it as a day string (see [`format_date`]).
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Exercise {
    /// Generated opaque id (never exposed in log entries)
    pub id: String,

    /// Owning user's id
    pub user_id: String,

    pub description: String,

    /// Duration in minutes
    pub duration: i64,

    /// Defaults to the creation instant when the client omits it
    pub date: DateTime<Utc>,
}

/// Request payload for creating a user
///
/// The field is optional so that a missing `username` reaches the handler
/// and yields the service's own 400 body instead of an extractor rejection.
#[derive(Deserialize)]
pub struct CreateUser {
    pub username: Option<String>,
}

/// Request payload for logging an exercise
///
/// All fields are loosely typed for the same reason as [`CreateUser`]:
/// validation and coercion happen in the handler. `duration` accepts either
/// a JSON number or a numeric string (the original store coerced strings).
#[derive(Deserialize)]
pub struct CreateExercise {
    pub description: Option<String>,
    pub duration: Option<Value>,
    pub date: Option<String>,
}

/// Response returned after logging an exercise: the exercise fields merged
/// with the owning user's id and name.
#[derive(Serialize)]
pub struct ExerciseResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    /// Rendered as e.g. "Mon Jan 01 2024"
    pub date: String,
    pub duration: i64,
    pub description: String,
}

/// Query parameters for the exercise log endpoint
///
/// `limit` stays a string here: a non-numeric value is silently ignored
/// rather than rejected at extraction time.
#[derive(Deserialize)]
pub struct LogParams {
    /// Lower date bound, exclusive, "YYYY-MM-DD"; unparseable values ignored
    pub from: Option<String>,
    /// Upper date bound, exclusive, "YYYY-MM-DD"; unparseable values ignored
    pub to: Option<String>,
    /// Maximum number of entries returned
    pub limit: Option<String>,
}

/// One entry of a user's exercise log. Record id and user linkage are
/// stripped; only the exercise's own fields remain.
#[derive(Serialize)]
pub struct LogEntry {
    pub description: String,
    pub duration: i64,
    pub date: String,
}

/// Response for GET /api/users/{id}/logs
#[derive(Serialize)]
pub struct LogResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    /// Number of entries in `log` (after filtering and limiting)
    pub count: usize,
    pub log: Vec<LogEntry>,
}

/// Request payload for shortening a URL
///
/// `url` is optional so a missing field maps to the "invalid url" body.
#[derive(Deserialize)]
pub struct ShortenRequest {
    pub url: Option<String>,
}

/// Response returned after successfully shortening a URL
///
/// # Example
/// ```json
/// {
///   "original_url": "https://example.com/very/long/url",
///   "short_url": 1
/// }
/// ```
#[derive(Serialize)]
pub struct ShortenResponse {
    pub original_url: String,
    /// The sequential code, a JSON number
    pub short_url: u64,
}

/// Renders a stored timestamp the way the API promises dates:
/// weekday, month, zero-padded day, year.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%a %b %d %Y").to_string()
}
