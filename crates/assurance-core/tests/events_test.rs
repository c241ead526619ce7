//! Tests for the assurance event system.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use assurance_core::events::dispatcher::EventDispatcher;
use assurance_core::events::handler::AssuranceEventHandler;
use assurance_core::events::types::*;
use assurance_core::models::{ConfidenceLabel, EvidenceStatus, PciStatus};

/// A test handler that counts events.
#[derive(Default)]
struct CountingHandler {
    saved: AtomicUsize,
    recomputed: AtomicUsize,
    transitions: AtomicUsize,
    status_changes: AtomicUsize,
    errors: AtomicUsize,
}

impl AssuranceEventHandler for CountingHandler {
    fn on_attestations_saved(&self, _event: &AttestationsSavedEvent) {
        self.saved.fetch_add(1, Ordering::Relaxed);
    }

    fn on_scores_recomputed(&self, _event: &ScoresRecomputedEvent) {
        self.recomputed.fetch_add(1, Ordering::Relaxed);
    }

    fn on_evidence_transition(&self, _event: &EvidenceTransitionEvent) {
        self.transitions.fetch_add(1, Ordering::Relaxed);
    }

    fn on_pci_status_changed(&self, _event: &PciStatusChangedEvent) {
        self.status_changes.fetch_add(1, Ordering::Relaxed);
    }

    fn on_error(&self, _event: &ErrorEvent) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }
}

struct PanickingHandler;

impl AssuranceEventHandler for PanickingHandler {
    fn on_error(&self, _event: &ErrorEvent) {
        panic!("handler bug");
    }
}

fn error_event() -> ErrorEvent {
    ErrorEvent {
        message: "boom".into(),
        error_code: "PERSISTENCE_ERROR".into(),
    }
}

#[test]
fn handler_noop_defaults() {
    struct NoopHandler;
    impl AssuranceEventHandler for NoopHandler {}

    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(Arc::new(NoopHandler));
    dispatcher.emit_activation_evaluated(&ActivationEvaluatedEvent {
        risk_id: "risk-1".into(),
        can_activate: true,
        response_type: None,
    });
    dispatcher.emit_error(&error_event());
}

#[test]
fn empty_dispatcher_is_silent() {
    let dispatcher = EventDispatcher::new();
    assert_eq!(dispatcher.handler_count(), 0);
    dispatcher.emit_error(&error_event());
}

#[test]
fn every_handler_receives_events() {
    let a = Arc::new(CountingHandler::default());
    let b = Arc::new(CountingHandler::default());
    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(a.clone());
    dispatcher.register(b.clone());
    assert_eq!(dispatcher.handler_count(), 2);

    dispatcher.emit_attestations_saved(&AttestationsSavedEvent {
        pci_instance_id: "pci-1".into(),
        updated_controls: 3,
    });
    dispatcher.emit_scores_recomputed(&ScoresRecomputedEvent {
        pci_instance_id: "pci-1".into(),
        effectiveness_percent: Some(66.7),
        confidence_score: 72,
        confidence_label: ConfidenceLabel::Medium,
    });
    dispatcher.emit_evidence_transition(&EvidenceTransitionEvent {
        request_id: "req-1".into(),
        from: EvidenceStatus::Open,
        to: EvidenceStatus::Submitted,
    });
    dispatcher.emit_pci_status_changed(&PciStatusChangedEvent {
        pci_instance_id: "pci-1".into(),
        from: PciStatus::Draft,
        to: PciStatus::Active,
    });

    for handler in [&a, &b] {
        assert_eq!(handler.saved.load(Ordering::Relaxed), 1);
        assert_eq!(handler.recomputed.load(Ordering::Relaxed), 1);
        assert_eq!(handler.transitions.load(Ordering::Relaxed), 1);
        assert_eq!(handler.status_changes.load(Ordering::Relaxed), 1);
        assert_eq!(handler.errors.load(Ordering::Relaxed), 0);
    }
}

#[test]
fn panicking_handler_does_not_stop_others() {
    let counter = Arc::new(CountingHandler::default());
    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(Arc::new(PanickingHandler));
    dispatcher.register(counter.clone());

    dispatcher.emit_error(&error_event());
    dispatcher.emit_error(&error_event());

    assert_eq!(counter.errors.load(Ordering::Relaxed), 2);
}
