//! Domain errors: data that violates the model itself.

use super::error_code::{self, AssuranceErrorCode};

/// Errors raised for malformed attestation data or unknown vocabulary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid attestation: {0}")]
    InvalidAttestation(String),

    #[error("Unknown {kind} value: '{value}'")]
    UnknownEnumValue { kind: &'static str, value: String },

    #[error("Inconsistent evidence state: {0}")]
    InconsistentEvidence(String),

    #[error("Control {control_id} does not belong to PCI instance {pci_instance_id}")]
    ForeignControl {
        control_id: String,
        pci_instance_id: String,
    },
}

impl AssuranceErrorCode for DomainError {
    fn error_code(&self) -> &'static str {
        error_code::DOMAIN_ERROR
    }
}
