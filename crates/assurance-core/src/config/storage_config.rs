//! Storage configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_BUSY_TIMEOUT_MS;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database path. `None` means in-memory.
    pub database_path: Option<PathBuf>,
    /// Busy timeout in milliseconds. Default: 5000.
    pub busy_timeout_ms: Option<u64>,
}

impl StorageConfig {
    pub fn effective_busy_timeout_ms(&self) -> u64 {
        self.busy_timeout_ms.unwrap_or(DEFAULT_BUSY_TIMEOUT_MS)
    }
}
