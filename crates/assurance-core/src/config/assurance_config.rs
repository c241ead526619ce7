//! Top-level configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ConfidenceConfig, EvidenceConfig, StorageConfig, TelemetryConfig};
use crate::constants::PROJECT_CONFIG_FILE;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`ASSURANCE_*`)
/// 2. Project config (`assurance.toml` in the given root)
/// 3. User config (`~/.assurance/config.toml`)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AssuranceConfig {
    pub confidence: ConfidenceConfig,
    pub evidence: EvidenceConfig,
    pub storage: StorageConfig,
    pub telemetry: TelemetryConfig,
}

impl AssuranceConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Lowest priority: user config. Unreadable files fall back to defaults,
        // but invalid TOML is reported.
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        ::tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &AssuranceConfig) -> Result<(), ConfigError> {
        let high = config.confidence.effective_high_threshold();
        let medium = config.confidence.effective_medium_threshold();
        if high > 100 {
            return Err(ConfigError::ValidationFailed {
                field: "confidence.high_threshold".to_string(),
                message: "must be between 0 and 100".to_string(),
            });
        }
        if medium >= high {
            return Err(ConfigError::ValidationFailed {
                field: "confidence.medium_threshold".to_string(),
                message: format!("must be below confidence.high_threshold ({high})"),
            });
        }
        let weights = config.confidence.effective_weights();
        if let Some(field) = weights.first_sign_violation() {
            return Err(ConfigError::ValidationFailed {
                field: format!("confidence.weights.{field}"),
                message: "sign contradicts the driver direction".to_string(),
            });
        }
        if !(0..=100).contains(&weights.baseline) {
            return Err(ConfigError::ValidationFailed {
                field: "confidence.weights.baseline".to_string(),
                message: "must be between 0 and 100".to_string(),
            });
        }
        if config.storage.busy_timeout_ms == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "storage.busy_timeout_ms".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the user config path: `~/.assurance/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".assurance").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut AssuranceConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: AssuranceConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it has a value.
    fn merge(base: &mut AssuranceConfig, other: &AssuranceConfig) {
        // Confidence
        if other.confidence.high_threshold.is_some() {
            base.confidence.high_threshold = other.confidence.high_threshold;
        }
        if other.confidence.medium_threshold.is_some() {
            base.confidence.medium_threshold = other.confidence.medium_threshold;
        }
        base.confidence.weights.merge_from(&other.confidence.weights);

        // Evidence
        if other.evidence.default_due_days.is_some() {
            base.evidence.default_due_days = other.evidence.default_due_days;
        }
        if other.evidence.require_submission_note.is_some() {
            base.evidence.require_submission_note = other.evidence.require_submission_note;
        }

        // Storage
        if other.storage.database_path.is_some() {
            base.storage.database_path = other.storage.database_path.clone();
        }
        if other.storage.busy_timeout_ms.is_some() {
            base.storage.busy_timeout_ms = other.storage.busy_timeout_ms;
        }

        // Telemetry
        if other.telemetry.log_filter.is_some() {
            base.telemetry.log_filter = other.telemetry.log_filter.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `ASSURANCE_CONFIDENCE_HIGH_THRESHOLD`, `ASSURANCE_STORAGE_DATABASE_PATH`, etc.
    fn apply_env_overrides(config: &mut AssuranceConfig) {
        if let Ok(val) = std::env::var("ASSURANCE_CONFIDENCE_HIGH_THRESHOLD") {
            if let Ok(v) = val.parse::<u32>() {
                config.confidence.high_threshold = Some(v);
            }
        }
        if let Ok(val) = std::env::var("ASSURANCE_CONFIDENCE_MEDIUM_THRESHOLD") {
            if let Ok(v) = val.parse::<u32>() {
                config.confidence.medium_threshold = Some(v);
            }
        }
        if let Ok(val) = std::env::var("ASSURANCE_EVIDENCE_DEFAULT_DUE_DAYS") {
            if let Ok(v) = val.parse::<u32>() {
                config.evidence.default_due_days = Some(v);
            }
        }
        if let Ok(val) = std::env::var("ASSURANCE_STORAGE_DATABASE_PATH") {
            config.storage.database_path = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("ASSURANCE_STORAGE_BUSY_TIMEOUT_MS") {
            if let Ok(v) = val.parse::<u64>() {
                config.storage.busy_timeout_ms = Some(v);
            }
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
