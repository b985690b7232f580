//! HTTP request handlers for the exercise tracker API
//!
//! This module implements the tracker's business logic:
//! - Creating and listing users
//! - Logging exercises against a user
//! - Returning a user's exercise log with date filtering and a result limit

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde_json::Value;

use crate::database::{next_seq, object_id, AppState, EXERCISE_SEQ, TABLE_EXERCISES, TABLE_USERS};
use crate::error::ApiError;
use crate::model::{
    format_date, CreateExercise, CreateUser, Exercise, ExerciseResponse, LogEntry, LogParams,
    LogResponse, User,
};

/// Lists every registered user
///
/// # Response
///
/// - **200 OK** - JSON array of `{_id, username}` in store order
/// - **500 Internal Server Error** - storage failure
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let read_txn = state.db.begin_read()?;
    let table = read_txn.open_table(TABLE_USERS)?;

    let users: Vec<User> = table
        .iter()?
        .filter_map(|res| {
            res.ok()
                .and_then(|(_, value)| serde_json::from_str(value.value()).ok())
        })
        .collect();

    Ok(Json(users))
}

/// Creates a new user
///
/// # Request Body
///
/// ```json
/// { "username": "bob" }
/// ```
///
/// # Response
///
/// - **200 OK** - the created `{_id, username}`
/// - **400 Bad Request** - username missing or empty
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUser>,
) -> Result<Json<User>, ApiError> {
    let username = payload
        .username
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::Validation("Bad request".to_string()))?;

    let user = User {
        id: object_id(),
        username,
    };
    let record_json = serde_json::to_string(&user)?;

    let write_txn = state.db.begin_write()?;
    {
        let mut table = write_txn.open_table(TABLE_USERS)?;
        table.insert(user.id.as_str(), record_json.as_str())?;
    }
    write_txn.commit()?;

    Ok(Json(user))
}

/// Logs an exercise for an existing user
///
/// The user is resolved first; nothing is stored when the id is unknown.
/// `duration` accepts a JSON number or a numeric string, `date` an optional
/// `YYYY-MM-DD` day (creation instant when omitted).
///
/// # Request Body
///
/// ```json
/// { "description": "morning run", "duration": 30, "date": "2024-01-01" }
/// ```
///
/// # Response
///
/// - **200 OK** - exercise fields merged with the user's `_id`/`username`,
///   `date` rendered as e.g. "Mon Jan 01 2024"
/// - **404 Not Found** - unknown user id
/// - **400 Bad Request** - validation failure, with a descriptive message
pub async fn create_exercise(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<CreateExercise>,
) -> Result<Json<ExerciseResponse>, ApiError> {
    let user = find_user(&state, &id)?;

    let description = payload
        .description
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ApiError::Validation("description is required".to_string()))?;
    let duration = coerce_duration(payload.duration.as_ref())?;
    let date = match payload.date.as_deref().filter(|d| !d.is_empty()) {
        Some(raw) => {
            parse_day(raw).ok_or_else(|| ApiError::Validation("invalid date".to_string()))?
        }
        None => Utc::now(),
    };

    let exercise = Exercise {
        id: object_id(),
        user_id: user.id.clone(),
        description,
        duration,
        date,
    };
    let record_json = serde_json::to_string(&exercise)?;

    let write_txn = state.db.begin_write()?;
    {
        // The per-user composite key carries a global sequence number so a
        // prefix range scan returns this user's exercises in creation order.
        let seq = next_seq(&write_txn, EXERCISE_SEQ)?;
        let key = format!("{}:{:016x}", exercise.user_id, seq);

        let mut table = write_txn.open_table(TABLE_EXERCISES)?;
        table.insert(key.as_str(), record_json.as_str())?;
    }
    write_txn.commit()?;

    Ok(Json(ExerciseResponse {
        id: user.id,
        username: user.username,
        date: format_date(&exercise.date),
        duration: exercise.duration,
        description: exercise.description,
    }))
}

/// Returns a user's exercise log
///
/// # Query Parameters
///
/// - `from` (optional) - exclusive lower date bound, "YYYY-MM-DD"
/// - `to` (optional) - exclusive upper date bound, "YYYY-MM-DD"
/// - `limit` (optional) - maximum number of entries returned
///
/// Unparseable `from`/`to` values are ignored, as is a non-numeric `limit`.
///
/// # Response
///
/// - **200 OK** - `{_id, username, count, log}` where each log entry keeps
///   only `{description, duration, date}`
/// - **404 Not Found** - unknown user id
pub async fn exercise_log(
    Path(id): Path<String>,
    Query(params): Query<LogParams>,
    State(state): State<AppState>,
) -> Result<Json<LogResponse>, ApiError> {
    let user = find_user(&state, &id)?;

    let from = params.from.as_deref().and_then(parse_day);
    let to = params.to.as_deref().and_then(parse_day);
    let limit = params
        .limit
        .as_deref()
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or(usize::MAX);

    let read_txn = state.db.begin_read()?;
    let table = read_txn.open_table(TABLE_EXERCISES)?;

    // Range scan over this user's key prefix. The character '{' is
    // lexicographically after ':', so it closes the prefix.
    let start_key = format!("{}:", user.id);
    let end_key = format!("{}:{{", user.id);

    let log: Vec<LogEntry> = table
        .range(start_key.as_str()..end_key.as_str())?
        .filter_map(|res| {
            res.ok()
                .and_then(|(_, value)| serde_json::from_str::<Exercise>(value.value()).ok())
        })
        .filter(|ex| from.is_none_or(|bound| ex.date > bound))
        .filter(|ex| to.is_none_or(|bound| ex.date < bound))
        .take(limit)
        .map(|ex| LogEntry {
            description: ex.description,
            duration: ex.duration,
            date: format_date(&ex.date),
        })
        .collect();

    Ok(Json(LogResponse {
        id: user.id,
        username: user.username,
        count: log.len(),
        log,
    }))
}

/// Looks up a user by id, mapping a miss to the endpoint's 404 body.
fn find_user(state: &AppState, id: &str) -> Result<User, ApiError> {
    let read_txn = state.db.begin_read()?;
    let table = read_txn.open_table(TABLE_USERS)?;

    match table.get(id)? {
        Some(guard) => Ok(serde_json::from_str(guard.value())?),
        None => Err(ApiError::NotFound("No such user".to_string())),
    }
}

/// Coerces the loosely-typed duration field to an integer.
///
/// The original store cast numeric strings, so `"30"` is accepted; anything
/// non-numeric is a validation error.
fn coerce_duration(value: Option<&Value>) -> Result<i64, ApiError> {
    let value =
        value.ok_or_else(|| ApiError::Validation("duration is required".to_string()))?;

    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| ApiError::Validation("duration must be a whole number".to_string())),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| ApiError::Validation("duration must be a number".to_string())),
        _ => Err(ApiError::Validation(
            "duration must be a number".to_string(),
        )),
    }
}

/// Parses a "YYYY-MM-DD" day into a midnight UTC timestamp.
fn parse_day(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
