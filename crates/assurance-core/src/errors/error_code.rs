//! AssuranceErrorCode trait for structured error reporting at call boundaries.

/// Every error enum implements this to provide a stable code string
/// that callers can branch on without parsing messages.
pub trait AssuranceErrorCode {
    /// Returns the error code string (e.g., "VALIDATION_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn coded_message(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const DOMAIN_ERROR: &str = "DOMAIN_ERROR";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const PERSISTENCE_ERROR: &str = "PERSISTENCE_ERROR";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const CONFLICT: &str = "CONFLICT";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
