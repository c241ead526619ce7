//! Fixed constants of the scoring model.

/// Upper bound of every DIME dimension score.
pub const DIMENSION_MAX: f64 = 3.0;

/// Ceiling applied to a dimension when one of its critical controls is answered `no`.
pub const HARD_CAP_CEILING: f64 = 1.0;

/// Effectiveness band lower bounds (inclusive), in percent.
pub const EFFECTIVENESS_STRONG: f64 = 75.0;
pub const EFFECTIVENESS_MODERATE: f64 = 50.0;
pub const EFFECTIVENESS_WEAK: f64 = 25.0;

/// Confidence label lower bounds (inclusive), 0-100 scale.
pub const DEFAULT_CONFIDENCE_HIGH: u32 = 90;
pub const DEFAULT_CONFIDENCE_MEDIUM: u32 = 70;

/// Default SQLite busy timeout.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Environment variable holding the tracing filter.
pub const LOG_ENV_VAR: &str = "ASSURANCE_LOG";

/// Project-level config file name.
pub const PROJECT_CONFIG_FILE: &str = "assurance.toml";
