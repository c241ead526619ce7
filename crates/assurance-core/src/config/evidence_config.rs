//! Evidence workflow configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EvidenceConfig {
    /// When set, requests created without a due date get `today + N days`.
    /// When unset, a missing due date is rejected.
    pub default_due_days: Option<u32>,
    /// Reject submissions with an empty note. Default: false.
    pub require_submission_note: Option<bool>,
}

impl EvidenceConfig {
    pub fn effective_require_submission_note(&self) -> bool {
        self.require_submission_note.unwrap_or(false)
    }
}
