//! PRAGMA configuration applied to every SQLite connection.
//!
//! WAL mode, NORMAL sync, foreign_keys ON, configurable busy_timeout,
//! temp_store MEMORY.

use assurance_core::errors::PersistenceError;
use rusqlite::Connection;

/// Apply write-connection pragmas.
pub fn apply_pragmas(conn: &Connection, busy_timeout_ms: u64) -> Result<(), PersistenceError> {
    conn.execute_batch(&format!(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA cache_size = -16000;
        PRAGMA busy_timeout = {busy_timeout_ms};
        PRAGMA temp_store = MEMORY;
        "
    ))
    .map_err(|e| PersistenceError::SqliteError {
        message: format!("failed to apply pragmas: {e}"),
    })
}

/// Apply pragmas to a read-only connection.
pub fn apply_read_pragmas(conn: &Connection, busy_timeout_ms: u64) -> Result<(), PersistenceError> {
    conn.execute_batch(&format!(
        "
        PRAGMA query_only = ON;
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = {busy_timeout_ms};
        PRAGMA temp_store = MEMORY;
        "
    ))
    .map_err(|e| PersistenceError::SqliteError {
        message: format!("failed to apply read pragmas: {e}"),
    })
}

/// Verify that WAL mode is active. Always false for in-memory databases.
pub fn verify_wal_mode(conn: &Connection) -> Result<bool, PersistenceError> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| PersistenceError::SqliteError {
            message: e.to_string(),
        })?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
