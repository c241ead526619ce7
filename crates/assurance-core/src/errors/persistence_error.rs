//! Store failures. Surfaced to the caller, never retried by the engine.

use super::error_code::{self, AssuranceErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("Migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("Corrupt row in {table}: {message}")]
    CorruptRow { table: &'static str, message: String },

    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl AssuranceErrorCode for PersistenceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            _ => error_code::PERSISTENCE_ERROR,
        }
    }
}
