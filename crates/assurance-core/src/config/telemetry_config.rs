//! Logging configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Filter used when `ASSURANCE_LOG` is unset. Default: "assurance=info".
    pub log_filter: Option<String>,
}

impl TelemetryConfig {
    pub fn effective_log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or("assurance=info")
    }
}
