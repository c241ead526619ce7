//! End-to-end engine tests against an in-memory SQLite store.

use std::sync::{Arc, Mutex};

use assurance_core::config::AssuranceConfig;
use assurance_core::errors::{
    AssuranceError, ConflictError, DomainError, NotFoundError, ValidationError,
};
use assurance_core::events::{
    ActivationEvaluatedEvent, AssuranceEventHandler, AttestationsSavedEvent, ErrorEvent,
    EvidenceTransitionEvent, PciStatusChangedEvent, ScoresRecomputedEvent,
};
use assurance_core::models::{
    AttestationStatus, ConfidenceLabel, ControlObjective, Criticality, Dimension, DriverType,
    Effectiveness, EffectivenessLabel, EvidenceStatus, EvidenceTarget, PciStatus, ResponseType,
    ReviewDecision, SecondaryControlTemplate, TemplateSuggestion,
};
use assurance_core::traits::{Clock, FixedClock};
use assurance_engine::{AssuranceEngine, AttestationEdit, NewEvidenceRequest, NewPciInstance};
use assurance_storage::SqliteStore;
use chrono::{Duration, NaiveDate, TimeZone, Utc};

#[derive(Default)]
struct RecordingHandler {
    events: Mutex<Vec<String>>,
}

impl RecordingHandler {
    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }

    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn count(&self, prefix: &str) -> usize {
        self.events().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

impl AssuranceEventHandler for RecordingHandler {
    fn on_attestations_saved(&self, event: &AttestationsSavedEvent) {
        self.push(format!("saved:{}", event.updated_controls));
    }
    fn on_scores_recomputed(&self, event: &ScoresRecomputedEvent) {
        self.push(format!("scores:{}", event.confidence_score));
    }
    fn on_evidence_transition(&self, event: &EvidenceTransitionEvent) {
        self.push(format!("evidence:{}->{}", event.from, event.to));
    }
    fn on_activation_evaluated(&self, event: &ActivationEvaluatedEvent) {
        self.push(format!("gate:{}", event.can_activate));
    }
    fn on_pci_status_changed(&self, event: &PciStatusChangedEvent) {
        self.push(format!("status:{}->{}", event.from, event.to));
    }
    fn on_error(&self, event: &ErrorEvent) {
        self.push(format!("error:{}", event.error_code));
    }
}

struct Harness {
    engine: AssuranceEngine<SqliteStore>,
    clock: Arc<FixedClock>,
    events: Arc<RecordingHandler>,
}

fn template(
    id: &str,
    dimension: Dimension,
    criticality: Criticality,
    sort_order: u32,
) -> SecondaryControlTemplate {
    SecondaryControlTemplate {
        id: id.into(),
        code: id.to_uppercase(),
        dimension,
        criticality,
        prompt: format!("Is {id} in place?"),
        sort_order,
    }
}

fn catalog() -> Vec<SecondaryControlTemplate> {
    vec![
        template("d1", Dimension::Design, Criticality::Critical, 1),
        template("d2", Dimension::Design, Criticality::Important, 2),
        template("i1", Dimension::Implementation, Criticality::Critical, 1),
        template("m1", Dimension::Monitoring, Criticality::Important, 1),
        template("e1", Dimension::Evaluation, Criticality::Critical, 1),
    ]
}

fn harness() -> Harness {
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap(),
    ));
    let events = Arc::new(RecordingHandler::default());
    let store = SqliteStore::open_in_memory().unwrap();
    let engine = AssuranceEngine::new(store, AssuranceConfig::default())
        .with_clock(clock.clone())
        .with_event_handler(events.clone());
    engine.seed_templates(&catalog()).unwrap();
    Harness {
        engine,
        clock,
        events,
    }
}

fn new_pci(risk_id: &str) -> NewPciInstance {
    NewPciInstance {
        risk_id: risk_id.into(),
        name: "Quarterly access review".into(),
        objective: ControlObjective::Likelihood,
        template_ids: catalog().into_iter().map(|t| t.id).collect(),
    }
}

/// Attest every control of `pci_id` `yes`, with evidence on the critical ones.
fn attest_all_yes(h: &Harness, pci_id: &str) {
    let mut edits = h.engine.begin_attestation(pci_id).unwrap();
    for control in h.engine.controls(pci_id).unwrap() {
        let critical = matches!(control.template_id.as_str(), "d1" | "i1" | "e1");
        edits.stage(
            AttestationEdit::from_control(&control)
                .status(AttestationStatus::Yes)
                .evidence(critical),
        );
    }
    h.engine.save_attestations(&mut edits).unwrap();
}

// ---- Catalog ----

#[test]
fn seeding_is_idempotent() {
    let h = harness();
    h.engine.seed_templates(&catalog()).unwrap();
    let templates = h.engine.templates().unwrap();
    assert_eq!(templates.len(), 5);
    let codes: Vec<&str> = templates.iter().map(|t| t.code.as_str()).collect();
    assert_eq!(codes, ["D1", "D2", "I1", "M1", "E1"]);
}

#[test]
fn seeding_rejects_duplicate_ids() {
    let h = harness();
    let dup = vec![
        template("x1", Dimension::Design, Criticality::Optional, 1),
        template("x1", Dimension::Design, Criticality::Optional, 2),
    ];
    let err = h.engine.seed_templates(&dup).unwrap_err();
    assert!(matches!(
        err,
        AssuranceError::Validation(ValidationError::InvalidField { field: "template.id", .. })
    ));
    assert_eq!(h.engine.templates().unwrap().len(), 5);
}

#[test]
fn recommendations_resolve_against_catalog() {
    let h = harness();
    let suggestions = vec![
        TemplateSuggestion {
            template_id: "m1".into(),
            rationale: "alerts exist".into(),
        },
        TemplateSuggestion {
            template_id: "nope".into(),
            rationale: "hallucinated".into(),
        },
        TemplateSuggestion {
            template_id: "d1".into(),
            rationale: "policy".into(),
        },
    ];
    let recs = h.engine.recommend_templates(&suggestions).unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].template.id, "m1");
    assert_eq!(recs[0].rank, 1);
    assert_eq!(recs[1].template.id, "d1");
    assert_eq!(recs[1].rank, 2);
}

// ---- Instantiation ----

#[test]
fn instantiate_creates_unattested_draft() {
    let h = harness();
    let pci = h.engine.instantiate_pci(new_pci("risk-1")).unwrap();
    assert_eq!(pci.status, PciStatus::Draft);

    let controls = h.engine.controls(&pci.id).unwrap();
    assert_eq!(controls.len(), 5);
    assert!(controls
        .iter()
        .all(|c| c.status == AttestationStatus::NotAttested && c.version == 0));

    let assessment = h.engine.assess(&pci.id).unwrap();
    assert_eq!(assessment.effectiveness, Effectiveness::NotComputed);
    assert_eq!(assessment.dime.attested_controls, 0);
    assert_eq!(assessment.dime.total_controls, 5);
}

#[test]
fn instantiate_rejects_unknown_template() {
    let h = harness();
    let mut new = new_pci("risk-1");
    new.template_ids.push("ghost".into());
    let err = h.engine.instantiate_pci(new).unwrap_err();
    assert!(matches!(err, AssuranceError::NotFound(NotFoundError::Template(id)) if id == "ghost"));
    assert!(h.engine.pci_instances_for_risk("risk-1").unwrap().is_empty());
    assert_eq!(h.events.count("error:"), 1);
}

#[test]
fn unknown_instance_is_not_found() {
    let h = harness();
    let err = h.engine.assess("missing").unwrap_err();
    assert!(matches!(err, AssuranceError::NotFound(NotFoundError::PciInstance(_))));
}

// ---- Attestation ----

#[test]
fn saving_attestations_recomputes_scores() {
    let h = harness();
    let pci = h.engine.instantiate_pci(new_pci("risk-1")).unwrap();
    attest_all_yes(&h, &pci.id);

    let assessment = h.engine.assess(&pci.id).unwrap();
    assert_eq!(assessment.dime.e_final, 3.0);
    assert_eq!(
        assessment.effectiveness,
        Effectiveness::Computed {
            percent: 100.0,
            label: EffectivenessLabel::Strong,
        }
    );
    assert_eq!(assessment.confidence.confidence_score, 85);
    assert_eq!(assessment.confidence.confidence_label, ConfidenceLabel::Medium);

    let controls = h.engine.controls(&pci.id).unwrap();
    assert!(controls.iter().all(|c| c.version == 1 && c.attested_at.is_some()));
    assert_eq!(h.events.events(), ["saved:5", "scores:85"]);

    let json = serde_json::to_value(&assessment).unwrap();
    assert_eq!(json["effectiveness"]["state"], "computed");
    assert_eq!(json["dime"]["constrained_by"], "none");
    assert_eq!(json["confidence"]["confidence_label"], "medium");
    assert_eq!(json["confidence"]["drivers"][0]["type"], "positive");
}

#[test]
fn critical_no_caps_and_constrains_evaluation() {
    let h = harness();
    let pci = h.engine.instantiate_pci(new_pci("risk-1")).unwrap();
    attest_all_yes(&h, &pci.id);

    let i1 = h
        .engine
        .controls(&pci.id)
        .unwrap()
        .into_iter()
        .find(|c| c.template_id == "i1")
        .unwrap();
    let mut edits = h.engine.begin_attestation(&pci.id).unwrap();
    edits.stage(AttestationEdit::from_control(&i1).status(AttestationStatus::No));
    let assessment = h.engine.save_attestations(&mut edits).unwrap();

    assert!(assessment.dime.cap_details.implementation.capped);
    // I1 is the only Implementation control: raw 0, under the cap.
    assert_eq!(assessment.dime.i_score, 0.0);
    assert_eq!(assessment.dime.e_final, 0.0);
    assert_eq!(
        assessment.dime.constrained_by,
        assurance_core::models::ConstrainedBy::Implementation
    );
}

#[test]
fn stale_edit_conflicts() {
    let h = harness();
    let pci = h.engine.instantiate_pci(new_pci("risk-1")).unwrap();
    let d1 = h
        .engine
        .controls(&pci.id)
        .unwrap()
        .into_iter()
        .find(|c| c.template_id == "d1")
        .unwrap();

    let mut first = h.engine.begin_attestation(&pci.id).unwrap();
    let mut second = h.engine.begin_attestation(&pci.id).unwrap();
    first.stage(AttestationEdit::from_control(&d1).status(AttestationStatus::Yes));
    second.stage(AttestationEdit::from_control(&d1).status(AttestationStatus::No));

    h.engine.save_attestations(&mut first).unwrap();
    let err = h.engine.save_attestations(&mut second).unwrap_err();
    assert!(matches!(
        err,
        AssuranceError::Conflict(ConflictError::VersionMismatch { expected: 0, actual: 1, .. })
    ));
    assert_eq!(second.len(), 1);

    let stored = h.engine.controls(&pci.id).unwrap();
    let d1 = stored.iter().find(|c| c.template_id == "d1").unwrap();
    assert_eq!(d1.status, AttestationStatus::Yes);
}

#[test]
fn invalid_batch_writes_nothing() {
    let h = harness();
    let pci = h.engine.instantiate_pci(new_pci("risk-1")).unwrap();
    let controls = h.engine.controls(&pci.id).unwrap();

    let mut edits = h.engine.begin_attestation(&pci.id).unwrap();
    edits.stage(AttestationEdit::from_control(&controls[0]).status(AttestationStatus::Yes));
    edits.stage(AttestationEdit::from_control(&controls[1]).status(AttestationStatus::Na));
    let err = h.engine.save_attestations(&mut edits).unwrap_err();
    assert!(matches!(
        err,
        AssuranceError::Validation(ValidationError::MissingNaRationale { .. })
    ));
    assert_eq!(edits.len(), 2);
    assert!(h
        .engine
        .controls(&pci.id)
        .unwrap()
        .iter()
        .all(|c| c.status == AttestationStatus::NotAttested && c.version == 0));
}

#[test]
fn foreign_control_is_rejected() {
    let h = harness();
    let a = h.engine.instantiate_pci(new_pci("risk-1")).unwrap();
    let b = h.engine.instantiate_pci(new_pci("risk-1")).unwrap();
    let b_control = h.engine.controls(&b.id).unwrap().remove(0);

    let mut edits = h.engine.begin_attestation(&a.id).unwrap();
    edits.stage(AttestationEdit::from_control(&b_control).status(AttestationStatus::Yes));
    let err = h.engine.save_attestations(&mut edits).unwrap_err();
    assert!(matches!(err, AssuranceError::Domain(DomainError::ForeignControl { .. })));
}

#[test]
fn na_forces_evidence_off() {
    let h = harness();
    let pci = h.engine.instantiate_pci(new_pci("risk-1")).unwrap();
    let m1 = h
        .engine
        .controls(&pci.id)
        .unwrap()
        .into_iter()
        .find(|c| c.template_id == "m1")
        .unwrap();

    let mut edits = h.engine.begin_attestation(&pci.id).unwrap();
    edits.stage(
        AttestationEdit::from_control(&m1)
            .not_applicable("no monitoring tooling in scope")
            .evidence(true),
    );
    h.engine.save_attestations(&mut edits).unwrap();

    let m1 = h
        .engine
        .controls(&pci.id)
        .unwrap()
        .into_iter()
        .find(|c| c.template_id == "m1")
        .unwrap();
    assert_eq!(m1.status, AttestationStatus::Na);
    assert!(!m1.evidence_exists);
    assert_eq!(m1.na_rationale.as_deref(), Some("no monitoring tooling in scope"));
}

// ---- Evidence ----

#[test]
fn evidence_lifecycle_moves_confidence() {
    let h = harness();
    let pci = h.engine.instantiate_pci(new_pci("risk-1")).unwrap();
    attest_all_yes(&h, &pci.id);
    let confidence = |h: &Harness| h.engine.assess(&pci.id).unwrap().confidence;

    let due = NaiveDate::from_ymd_opt(2026, 6, 11).unwrap();
    let request = h
        .engine
        .create_evidence_request(
            NewEvidenceRequest::new(EvidenceTarget::PciInstance(pci.id.clone()), due)
                .critical_scope(),
        )
        .unwrap();
    assert_eq!(request.status, EvidenceStatus::Open);
    assert_eq!(request.risk_id, "risk-1");
    assert_eq!(confidence(&h).confidence_score, 83);

    h.clock.advance(Duration::days(11));
    assert!(h.engine.is_overdue(&h.engine.evidence_request(&request.id).unwrap()));
    let score = confidence(&h);
    assert_eq!(score.confidence_score, 75);
    assert!(score.driver(DriverType::EvidenceOverdue).is_some());

    let submitted = h.engine.submit_evidence(&request.id, "exported access list").unwrap();
    assert_eq!(submitted.status, EvidenceStatus::Submitted);
    assert_eq!(confidence(&h).confidence_score, 85);

    let err = h
        .engine
        .review_evidence(&request.id, ReviewDecision::Rejected, None)
        .unwrap_err();
    assert!(matches!(
        err,
        AssuranceError::Validation(ValidationError::MissingReviewNotes)
    ));
    assert_eq!(
        h.engine.evidence_request(&request.id).unwrap().status,
        EvidenceStatus::Submitted
    );

    h.engine
        .review_evidence(
            &request.id,
            ReviewDecision::Rejected,
            Some("export is missing service accounts".into()),
        )
        .unwrap();
    assert_eq!(confidence(&h).confidence_score, 69);

    h.engine.submit_evidence(&request.id, "full export").unwrap();
    h.engine
        .review_evidence(&request.id, ReviewDecision::Accepted, None)
        .unwrap();
    let score = confidence(&h);
    assert_eq!(score.confidence_score, 93);
    assert_eq!(score.confidence_label, ConfidenceLabel::High);

    let closed = h.engine.close_evidence_request(&request.id).unwrap();
    assert_eq!(closed.status, EvidenceStatus::Closed);
    assert_eq!(confidence(&h).confidence_score, 93);

    let submissions = h.engine.submissions(&request.id).unwrap();
    assert_eq!(submissions.len(), 2);
    assert_eq!(submissions[0].decision, Some(ReviewDecision::Rejected));
    assert_eq!(submissions[1].decision, Some(ReviewDecision::Accepted));
    assert_eq!(
        h.events.count("evidence:"),
        5,
        "submit, reject, submit, accept, close"
    );
}

#[test]
fn control_target_resolves_to_its_instance() {
    let h = harness();
    let pci = h.engine.instantiate_pci(new_pci("risk-1")).unwrap();
    let control = h.engine.controls(&pci.id).unwrap().remove(0);
    let due = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();

    let request = h
        .engine
        .create_evidence_request(NewEvidenceRequest::new(
            EvidenceTarget::SecondaryControl(control.id.clone()),
            due,
        ))
        .unwrap();
    assert_eq!(request.pci_instance_id.as_deref(), Some(pci.id.as_str()));
    assert_eq!(h.engine.evidence_requests_for(&pci.id).unwrap().len(), 1);
}

#[test]
fn risk_level_request_feeds_every_instance() {
    let h = harness();
    let a = h.engine.instantiate_pci(new_pci("risk-1")).unwrap();
    let b = h.engine.instantiate_pci(new_pci("risk-1")).unwrap();
    let other = h.engine.instantiate_pci(new_pci("risk-2")).unwrap();
    let due = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();

    let before = h.events.count("scores:");
    h.engine
        .create_evidence_request(NewEvidenceRequest::new(EvidenceTarget::Risk("risk-1".into()), due))
        .unwrap();
    assert_eq!(h.events.count("scores:") - before, 2);

    assert_eq!(h.engine.evidence_requests_for(&a.id).unwrap().len(), 1);
    assert_eq!(h.engine.evidence_requests_for(&b.id).unwrap().len(), 1);
    assert!(h.engine.evidence_requests_for(&other.id).unwrap().is_empty());
}

#[test]
fn blank_risk_target_is_rejected() {
    let h = harness();
    let due = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
    for risk_id in ["", "   "] {
        let err = h
            .engine
            .create_evidence_request(NewEvidenceRequest::new(EvidenceTarget::Risk(risk_id.into()), due))
            .unwrap_err();
        assert!(matches!(
            err,
            AssuranceError::Validation(ValidationError::InvalidField { field: "target.risk_id", .. })
        ));
    }
    assert_eq!(h.events.count("error:"), 2);
}

#[test]
fn unknown_request_is_not_found() {
    let h = harness();
    let err = h.engine.submit_evidence("nope", "x").unwrap_err();
    assert!(matches!(
        err,
        AssuranceError::NotFound(NotFoundError::EvidenceRequest(_))
    ));
}

// ---- Activation ----

#[test]
fn activation_requires_response_and_full_attestation() {
    let h = harness();
    let pci = h.engine.instantiate_pci(new_pci("risk-1")).unwrap();

    let decision = h.engine.activation_gate("risk-1").unwrap();
    assert!(!decision.can_activate);
    let err = h.engine.activate_pci(&pci.id).unwrap_err();
    assert!(matches!(
        err,
        AssuranceError::Validation(ValidationError::MissingRiskResponse { .. })
    ));

    h.engine
        .set_risk_response("risk-1", ResponseType::ReduceLikelihood, Some("patch faster".into()), None)
        .unwrap();
    let decision = h.engine.activation_gate("risk-1").unwrap();
    assert!(!decision.can_activate);
    assert_eq!(decision.pci_count, 1);
    let err = h.engine.activate_pci(&pci.id).unwrap_err();
    assert!(matches!(
        err,
        AssuranceError::Validation(ValidationError::AttestationIncomplete { attested: 0, total: 5, .. })
    ));

    attest_all_yes(&h, &pci.id);
    let decision = h.engine.activation_gate("risk-1").unwrap();
    assert!(decision.can_activate);
    assert_eq!(decision.complete_pci_count, 1);

    let active = h.engine.activate_pci(&pci.id).unwrap();
    assert_eq!(active.status, PciStatus::Active);
    assert_eq!(active.activated_at, Some(h.clock.now()));
    assert_eq!(h.engine.pci_instance(&pci.id).unwrap().status, PciStatus::Active);
}

#[test]
fn accept_response_passes_without_instances() {
    let h = harness();
    h.engine
        .set_risk_response("risk-9", ResponseType::Accept, None, None)
        .unwrap();
    let decision = h.engine.activation_gate("risk-9").unwrap();
    assert!(decision.can_activate);
    assert_eq!(decision.pci_count, 0);
    assert_eq!(h.events.events().last().map(String::as_str), Some("gate:true"));
}

#[test]
fn retired_instance_is_read_only() {
    let h = harness();
    let pci = h.engine.instantiate_pci(new_pci("risk-1")).unwrap();
    h.engine
        .set_risk_response("risk-1", ResponseType::Avoid, None, None)
        .unwrap();
    attest_all_yes(&h, &pci.id);
    h.engine.activate_pci(&pci.id).unwrap();
    let retired = h.engine.retire_pci(&pci.id).unwrap();
    assert_eq!(retired.status, PciStatus::Retired);
    assert!(retired.retired_at.is_some());

    assert!(matches!(
        h.engine.begin_attestation(&pci.id).unwrap_err(),
        AssuranceError::Validation(ValidationError::InvalidTransition { action: "modify", .. })
    ));
    let due = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
    assert!(h
        .engine
        .create_evidence_request(NewEvidenceRequest::new(
            EvidenceTarget::PciInstance(pci.id.clone()),
            due
        ))
        .is_err());

    // History stays readable and the gate ignores the retired instance.
    assert!(h.engine.assess(&pci.id).is_ok());
    let decision = h.engine.activation_gate("risk-1").unwrap();
    assert_eq!(decision.pci_count, 0);
    assert!(!decision.can_activate);
    assert_eq!(h.events.count("status:"), 2);
}
