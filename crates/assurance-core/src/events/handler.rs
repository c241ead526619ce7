//! AssuranceEventHandler trait, all methods with no-op defaults.

use super::types::*;

/// Trait for observing engine state changes.
///
/// Handlers only override the events they care about. `Send + Sync` so a
/// single handler can be shared by engines on different threads.
pub trait AssuranceEventHandler: Send + Sync {
    // ---- Attestation ----
    fn on_attestations_saved(&self, _event: &AttestationsSavedEvent) {}
    fn on_scores_recomputed(&self, _event: &ScoresRecomputedEvent) {}

    // ---- Evidence ----
    fn on_evidence_transition(&self, _event: &EvidenceTransitionEvent) {}

    // ---- Activation ----
    fn on_activation_evaluated(&self, _event: &ActivationEvaluatedEvent) {}
    fn on_pci_status_changed(&self, _event: &PciStatusChangedEvent) {}

    // ---- Errors ----
    fn on_error(&self, _event: &ErrorEvent) {}
}
