//! Lookups that referenced a non-existent record.

use super::error_code::{self, AssuranceErrorCode};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NotFoundError {
    #[error("Control template not found: {0}")]
    Template(String),

    #[error("PCI instance not found: {0}")]
    PciInstance(String),

    #[error("Secondary control instance not found: {0}")]
    ControlInstance(String),

    #[error("Evidence request not found: {0}")]
    EvidenceRequest(String),

    #[error("Evidence submission not found for request {0}")]
    Submission(String),
}

impl AssuranceErrorCode for NotFoundError {
    fn error_code(&self) -> &'static str {
        error_code::NOT_FOUND
    }
}
