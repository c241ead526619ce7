//! Validation errors: rejected input or an illegal state transition.

use super::error_code::{self, AssuranceErrorCode};

/// Errors raised when a request is well-formed but not allowed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Evidence request requires a due date")]
    MissingDueDate,

    #[error("Control {control} is marked N/A without a rationale")]
    MissingNaRationale { control: String },

    #[error("Rejecting a submission requires review notes")]
    MissingReviewNotes,

    #[error("Submission note must not be empty")]
    MissingSubmissionNote,

    #[error("Cannot {action} {entity} in state '{state}'")]
    InvalidTransition {
        entity: &'static str,
        action: &'static str,
        state: String,
    },

    #[error("Attestation incomplete for {pci_instance_id}: {attested} of {total} controls attested")]
    AttestationIncomplete {
        pci_instance_id: String,
        attested: usize,
        total: usize,
    },

    #[error("Risk {risk_id} has no declared risk response")]
    MissingRiskResponse { risk_id: String },

    #[error("Invalid field {field}: {message}")]
    InvalidField { field: &'static str, message: String },
}

impl AssuranceErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        error_code::VALIDATION_ERROR
    }
}
