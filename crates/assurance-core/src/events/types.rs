//! Event payload types.

use crate::models::{ConfidenceLabel, EvidenceStatus, PciStatus, ResponseType};

/// Payload for `on_attestations_saved`.
#[derive(Debug, Clone)]
pub struct AttestationsSavedEvent {
    pub pci_instance_id: String,
    pub updated_controls: usize,
}

/// Payload for `on_scores_recomputed`.
#[derive(Debug, Clone)]
pub struct ScoresRecomputedEvent {
    pub pci_instance_id: String,
    /// `None` while nothing is attested.
    pub effectiveness_percent: Option<f64>,
    pub confidence_score: u32,
    pub confidence_label: ConfidenceLabel,
}

/// Payload for `on_evidence_transition`.
#[derive(Debug, Clone)]
pub struct EvidenceTransitionEvent {
    pub request_id: String,
    pub from: EvidenceStatus,
    pub to: EvidenceStatus,
}

/// Payload for `on_activation_evaluated`.
#[derive(Debug, Clone)]
pub struct ActivationEvaluatedEvent {
    pub risk_id: String,
    pub can_activate: bool,
    pub response_type: Option<ResponseType>,
}

/// Payload for `on_pci_status_changed`.
#[derive(Debug, Clone)]
pub struct PciStatusChangedEvent {
    pub pci_instance_id: String,
    pub from: PciStatus,
    pub to: PciStatus,
}

/// Payload for `on_error`.
#[derive(Debug, Clone)]
pub struct ErrorEvent {
    pub message: String,
    pub error_code: String,
}
