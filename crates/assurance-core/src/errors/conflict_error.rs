//! Optimistic-concurrency conflicts.

use super::error_code::{self, AssuranceErrorCode};

/// Raised when a write was based on a stale version of a record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConflictError {
    #[error("{entity} {id} was modified concurrently: expected version {expected}, found {actual}")]
    VersionMismatch {
        entity: &'static str,
        id: String,
        expected: u64,
        actual: u64,
    },

    #[error("{entity} {id} changed state concurrently: expected '{expected}', found '{actual}'")]
    StateMismatch {
        entity: &'static str,
        id: String,
        expected: String,
        actual: String,
    },
}

impl AssuranceErrorCode for ConflictError {
    fn error_code(&self) -> &'static str {
        error_code::CONFLICT
    }
}
