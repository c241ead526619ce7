//! Error handling for the assurance engine.
//! One error enum per failure family, `thiserror` only, zero `anyhow`.

pub mod assurance_error;
pub mod config_error;
pub mod conflict_error;
pub mod domain_error;
pub mod error_code;
pub mod not_found_error;
pub mod persistence_error;
pub mod validation_error;

pub use assurance_error::{AssuranceError, AssuranceResult};
pub use config_error::ConfigError;
pub use conflict_error::ConflictError;
pub use domain_error::DomainError;
pub use error_code::AssuranceErrorCode;
pub use not_found_error::NotFoundError;
pub use persistence_error::PersistenceError;
pub use validation_error::ValidationError;
