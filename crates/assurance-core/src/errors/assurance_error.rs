//! Aggregate error returned across crate boundaries.

use super::error_code::AssuranceErrorCode;
use super::{
    ConfigError, ConflictError, DomainError, NotFoundError, PersistenceError, ValidationError,
};

/// Errors surfaced by engine and store operations.
/// Aggregates the per-family errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum AssuranceError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Not found: {0}")]
    NotFound(#[from] NotFoundError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Conflict: {0}")]
    Conflict(#[from] ConflictError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type AssuranceResult<T> = Result<T, AssuranceError>;

impl AssuranceErrorCode for AssuranceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.error_code(),
            Self::Domain(e) => e.error_code(),
            Self::NotFound(e) => e.error_code(),
            Self::Persistence(e) => e.error_code(),
            Self::Conflict(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}
