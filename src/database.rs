//! Database initialization, table definitions and id helpers
//!
//! Both services keep their durable state in a single embedded redb file.
//! Records are stored as JSON strings; secondary tables provide the
//! per-user exercise ordering, the original_url uniqueness check and the
//! sequential short-code assignment.

use rand::Rng;
use redb::{Database, ReadableTable, TableDefinition, WriteTransaction};
use std::sync::Arc;

/// Users by id.
///
/// Key: opaque user id (hex string, see [`object_id`])
/// Value: JSON-serialized User
pub const TABLE_USERS: TableDefinition<&str, &str> = TableDefinition::new("users_v1");

/// Exercises, keyed for per-user range scans.
///
/// Key: composite key in format "{user_id}:{seq:016x}"
/// Value: JSON-serialized Exercise
///
/// The zero-padded sequence number keeps one user's exercises in creation
/// order under a prefix range scan, matching the insertion-order listing the
/// log endpoint promises.
pub const TABLE_EXERCISES: TableDefinition<&str, &str> = TableDefinition::new("exercises_v1");

/// Short URLs by code.
///
/// Key: sequential short code (starts at 1, never reused)
/// Value: the original URL
pub const TABLE_URLS: TableDefinition<u64, &str> = TableDefinition::new("urls_v1");

/// Reverse index for the original_url uniqueness constraint.
///
/// Key: original URL
/// Value: the short code it was assigned
pub const TABLE_URL_INDEX: TableDefinition<&str, u64> = TableDefinition::new("url_index_v1");

/// Counters for sequential id assignment.
///
/// Key: counter name ([`SHORT_URL_SEQ`] or [`EXERCISE_SEQ`])
/// Value: last value handed out
pub const TABLE_COUNTERS: TableDefinition<&str, u64> = TableDefinition::new("counters_v1");

pub const SHORT_URL_SEQ: &str = "short_url";
pub const EXERCISE_SEQ: &str = "exercise";

/// Application state shared across all request handlers
///
/// Wraps the database instance in an Arc for thread-safe sharing across
/// async handlers in the Axum web framework. Handlers receive this through
/// `State` extraction; there is no ambient global handle.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe reference to the embedded database
    pub db: Arc<Database>,
}

/// Initializes the embedded database and creates required tables
///
/// Creates or opens the database file at the specified path, opens every
/// table once so they exist, and commits.
///
/// # Arguments
///
/// * `db_path` - File path where the database should be stored (e.g., "data.db")
pub fn init_db(db_path: &str) -> Result<Database, redb::Error> {
    let db = Database::create(db_path)?;

    let write_txn = db.begin_write()?;
    {
        write_txn.open_table(TABLE_USERS)?;
        write_txn.open_table(TABLE_EXERCISES)?;
        write_txn.open_table(TABLE_URLS)?;
        write_txn.open_table(TABLE_URL_INDEX)?;
        write_txn.open_table(TABLE_COUNTERS)?;
    }
    write_txn.commit()?;

    Ok(db)
}

/// Returns the next value of a named counter.
///
/// The increment happens inside the caller's write transaction, so counter
/// bump and record insert commit (or abort) together. Counters start at 1.
pub fn next_seq(write_txn: &WriteTransaction, name: &str) -> Result<u64, redb::Error> {
    let mut counters = write_txn.open_table(TABLE_COUNTERS)?;
    let next = counters.get(name)?.map(|g| g.value()).unwrap_or(0) + 1;
    counters.insert(name, next)?;
    Ok(next)
}

/// Generates an opaque record id: 8 hex chars of unix seconds followed by
/// 16 random hex chars.
///
/// The timestamp prefix keeps ids roughly creation-ordered when used as
/// table keys, the random suffix makes collisions a non-issue.
pub fn object_id() -> String {
    let ts = chrono::Utc::now().timestamp() as u32;
    let suffix: u64 = rand::rng().random();
    format!("{:08x}{:016x}", ts, suffix)
}
