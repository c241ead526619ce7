//! Schema migrations using PRAGMA user_version.

pub mod v001_initial;
pub mod v002_evidence;

use assurance_core::errors::PersistenceError;
use rusqlite::Connection;

/// Highest schema version this build knows about.
pub const LATEST_VERSION: u32 = 2;

/// Run all pending migrations. Each one runs in its own transaction
/// together with the version bump.
pub fn run_migrations(conn: &Connection) -> Result<(), PersistenceError> {
    let current = current_version(conn).map_err(|e| PersistenceError::MigrationFailed {
        version: 0,
        message: e.to_string(),
    })?;

    let migrations: &[(&str, u32)] = &[
        (v001_initial::MIGRATION_SQL, 1),
        (v002_evidence::MIGRATION_SQL, 2),
    ];

    for (sql, version) in migrations {
        if current >= *version {
            continue;
        }
        let failed = |e: rusqlite::Error| PersistenceError::MigrationFailed {
            version: *version,
            message: e.to_string(),
        };
        let tx = conn.unchecked_transaction().map_err(failed)?;
        tx.execute_batch(sql).map_err(failed)?;
        tx.pragma_update(None, "user_version", version).map_err(failed)?;
        tx.commit().map_err(failed)?;
        tracing::info!(version = version, "applied migration");
    }

    Ok(())
}

/// Get the current schema version.
pub fn current_version(conn: &Connection) -> Result<u32, PersistenceError> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| PersistenceError::SqliteError {
            message: e.to_string(),
        })
}
