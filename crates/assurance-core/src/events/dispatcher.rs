//! EventDispatcher: synchronous event dispatch with zero overhead when empty.

use std::sync::Arc;

use super::handler::AssuranceEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn AssuranceEventHandler>>,
}

impl EventDispatcher {
    /// Create a new empty dispatcher.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register an event handler.
    pub fn register(&mut self, handler: Arc<dyn AssuranceEventHandler>) {
        self.handlers.push(handler);
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Emit an event to all registered handlers.
    /// A panicking handler is logged and does not stop the others.
    fn emit<F: Fn(&dyn AssuranceEventHandler)>(&self, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                ::tracing::error!("event handler panicked");
            }
        }
    }

    // ---- Attestation ----
    pub fn emit_attestations_saved(&self, event: &AttestationsSavedEvent) {
        self.emit(|h| h.on_attestations_saved(event));
    }

    pub fn emit_scores_recomputed(&self, event: &ScoresRecomputedEvent) {
        self.emit(|h| h.on_scores_recomputed(event));
    }

    // ---- Evidence ----
    pub fn emit_evidence_transition(&self, event: &EvidenceTransitionEvent) {
        self.emit(|h| h.on_evidence_transition(event));
    }

    // ---- Activation ----
    pub fn emit_activation_evaluated(&self, event: &ActivationEvaluatedEvent) {
        self.emit(|h| h.on_activation_evaluated(event));
    }

    pub fn emit_pci_status_changed(&self, event: &PciStatusChangedEvent) {
        self.emit(|h| h.on_pci_status_changed(event));
    }

    // ---- Errors ----
    pub fn emit_error(&self, event: &ErrorEvent) {
        self.emit(|h| h.on_error(event));
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
