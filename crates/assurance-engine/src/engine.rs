//! AssuranceEngine: commits operations through an `AssuranceStore` and
//! recomputes derived scores from the latest committed state.
//!
//! Every public operation is one atomic unit. Validation happens before the
//! store is touched and the store applies each write in a single transaction.
//! A failed operation therefore leaves the stored state as it was. Once a
//! write has committed the operation succeeds; a recompute that fails after
//! it is reported through `on_error` only.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use rustc_hash::FxHashSet;
use serde::Serialize;
use uuid::Uuid;

use assurance_core::config::AssuranceConfig;
use assurance_core::errors::{
    AssuranceErrorCode, AssuranceResult, ConflictError, DomainError, NotFoundError,
    ValidationError,
};
use assurance_core::events::{
    ActivationEvaluatedEvent, AssuranceEventHandler, AttestationsSavedEvent, ErrorEvent,
    EventDispatcher, EvidenceTransitionEvent, PciStatusChangedEvent, ScoresRecomputedEvent,
};
use assurance_core::models::{
    ActivationDecision, AiProposedResponse, ConfidenceScore, ControlObjective, DerivedDimeScore,
    Effectiveness, EvidenceRequest, EvidenceSubmission, EvidenceTarget, PciAttestationSummary,
    PciInstance, PciStatus, ResponseType, ReviewDecision, RiskResponse, SecondaryControlInstance,
    SecondaryControlTemplate, TemplateRecommendation, TemplateSuggestion,
};
use assurance_core::traits::{AssuranceStore, AttestationWrite, Clock, SystemClock};

use crate::attestation::PendingAttestationEdits;
use crate::confidence::{relevant_requests, ConfidenceInputs, ConfidenceScorer};
use crate::dime::{compute_dime, join_controls, normalize};
use crate::evidence::{EvidenceAction, EvidenceWorkflow, NewEvidenceRequest};
use crate::gate::ActivationGate;
use crate::recommendation;

/// Everything derived for one PCI instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub pci_instance_id: String,
    pub dime: DerivedDimeScore,
    pub effectiveness: Effectiveness,
    pub confidence: ConfidenceScore,
}

/// Committed state an assessment is computed from.
struct ScoringSnapshot {
    controls: Vec<SecondaryControlInstance>,
    templates: Vec<SecondaryControlTemplate>,
    requests: Vec<EvidenceRequest>,
}

/// Mirror of what the store does with an `AttestationWrite`.
fn apply_write(control: &mut SecondaryControlInstance, write: &AttestationWrite) {
    control.status = write.status;
    control.evidence_exists = write.evidence_exists;
    control.notes = write.notes.clone();
    control.na_rationale = write.na_rationale.clone();
    control.attested_at = write.attested_at;
    control.version = write.expected_version + 1;
}

/// Input for `instantiate_pci`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPciInstance {
    pub risk_id: String,
    pub name: String,
    pub objective: ControlObjective,
    pub template_ids: Vec<String>,
}

pub struct AssuranceEngine<S: AssuranceStore> {
    store: S,
    config: AssuranceConfig,
    clock: Arc<dyn Clock>,
    dispatcher: EventDispatcher,
    scorer: ConfidenceScorer,
    workflow: EvidenceWorkflow,
}

impl<S: AssuranceStore> AssuranceEngine<S> {
    pub fn new(store: S, config: AssuranceConfig) -> Self {
        let scorer = ConfidenceScorer::new(&config.confidence);
        let workflow = EvidenceWorkflow::new(&config.evidence);
        Self {
            store,
            config,
            clock: Arc::new(SystemClock),
            dispatcher: EventDispatcher::new(),
            scorer,
            workflow,
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_event_handler(mut self, handler: Arc<dyn AssuranceEventHandler>) -> Self {
        self.dispatcher.register(handler);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &AssuranceConfig {
        &self.config
    }

    // ---- Template catalog ----

    /// Seed the immutable control catalog.
    pub fn seed_templates(&self, templates: &[SecondaryControlTemplate]) -> AssuranceResult<()> {
        let mut ids = FxHashSet::default();
        for template in templates {
            if template.code.trim().is_empty() {
                return self.fail(ValidationError::InvalidField {
                    field: "template.code",
                    message: format!("template {} has an empty code", template.id),
                });
            }
            if !ids.insert(template.id.as_str()) {
                return self.fail(ValidationError::InvalidField {
                    field: "template.id",
                    message: format!("duplicate template id {}", template.id),
                });
            }
        }
        self.reported(self.store.insert_templates(templates))?;
        tracing::info!(count = templates.len(), "seeded control templates");
        Ok(())
    }

    pub fn templates(&self) -> AssuranceResult<Vec<SecondaryControlTemplate>> {
        self.reported(self.store.list_templates())
    }

    /// Resolve the suggestion provider's ranked list against the catalog.
    pub fn recommend_templates(
        &self,
        suggestions: &[TemplateSuggestion],
    ) -> AssuranceResult<Vec<TemplateRecommendation>> {
        let catalog = self.templates()?;
        Ok(recommendation::recommend_templates(&catalog, suggestions))
    }

    // ---- PCI instances ----

    /// Create a draft PCI instance with one unanswered control per template.
    pub fn instantiate_pci(&self, new: NewPciInstance) -> AssuranceResult<PciInstance> {
        if new.name.trim().is_empty() {
            return self.fail(ValidationError::InvalidField {
                field: "name",
                message: "must not be empty".to_string(),
            });
        }
        if new.template_ids.is_empty() {
            return self.fail(ValidationError::InvalidField {
                field: "template_ids",
                message: "at least one control template is required".to_string(),
            });
        }
        let catalog = self.templates()?;
        let known: FxHashSet<&str> = catalog.iter().map(|t| t.id.as_str()).collect();
        let mut seen = FxHashSet::default();
        for template_id in &new.template_ids {
            if !seen.insert(template_id.as_str()) {
                return self.fail(ValidationError::InvalidField {
                    field: "template_ids",
                    message: format!("template {template_id} selected twice"),
                });
            }
            if !known.contains(template_id.as_str()) {
                return self.fail(NotFoundError::Template(template_id.clone()));
            }
        }

        let now = self.clock.now();
        let instance = PciInstance {
            id: Uuid::new_v4().to_string(),
            risk_id: new.risk_id,
            name: new.name.trim().to_string(),
            objective: new.objective,
            status: PciStatus::Draft,
            created_at: now,
            activated_at: None,
            retired_at: None,
        };
        let controls: Vec<SecondaryControlInstance> = new
            .template_ids
            .iter()
            .map(|template_id| {
                SecondaryControlInstance::unattested(
                    Uuid::new_v4().to_string(),
                    instance.id.clone(),
                    template_id.clone(),
                )
            })
            .collect();

        self.reported(self.store.create_pci_instance(&instance, &controls))?;
        tracing::info!(
            pci_instance_id = %instance.id,
            risk_id = %instance.risk_id,
            controls = controls.len(),
            "instantiated PCI instance"
        );
        Ok(instance)
    }

    pub fn pci_instance(&self, pci_instance_id: &str) -> AssuranceResult<PciInstance> {
        match self.reported(self.store.get_pci_instance(pci_instance_id))? {
            Some(instance) => Ok(instance),
            None => self.fail(NotFoundError::PciInstance(pci_instance_id.to_string())),
        }
    }

    pub fn pci_instances_for_risk(&self, risk_id: &str) -> AssuranceResult<Vec<PciInstance>> {
        self.reported(self.store.list_pci_instances(risk_id))
    }

    pub fn controls(&self, pci_instance_id: &str) -> AssuranceResult<Vec<SecondaryControlInstance>> {
        self.pci_instance(pci_instance_id)?;
        self.reported(self.store.list_controls(pci_instance_id))
    }

    // ---- Attestation ----

    /// Open an empty edit session for a PCI instance.
    pub fn begin_attestation(&self, pci_instance_id: &str) -> AssuranceResult<PendingAttestationEdits> {
        let instance = self.pci_instance(pci_instance_id)?;
        self.ensure_editable(&instance)?;
        Ok(PendingAttestationEdits::new(instance.id))
    }

    /// Apply every staged edit atomically, then recompute.
    ///
    /// On success the pending edits are cleared. On failure nothing is
    /// written and the edits are kept so the caller can fix and retry.
    pub fn save_attestations(&self, edits: &mut PendingAttestationEdits) -> AssuranceResult<Assessment> {
        let instance = self.pci_instance(edits.pci_instance_id())?;
        self.ensure_editable(&instance)?;

        if edits.is_empty() {
            return self.assess(&instance.id);
        }

        for edit in edits.iter() {
            let control = match self.reported(self.store.get_control(&edit.control_id))? {
                Some(control) => control,
                None => return self.fail(NotFoundError::ControlInstance(edit.control_id.clone())),
            };
            if control.pci_instance_id != instance.id {
                return self.fail(DomainError::ForeignControl {
                    control_id: control.id,
                    pci_instance_id: instance.id,
                });
            }
            if control.version != edit.base_version {
                return self.fail(ConflictError::VersionMismatch {
                    entity: "control instance",
                    id: control.id,
                    expected: edit.base_version,
                    actual: control.version,
                });
            }
        }

        let writes = self.reported(edits.to_writes(self.clock.now()).map_err(Into::into))?;

        // Score the post-save state before writing, so a failed read leaves
        // nothing committed.
        let mut snapshot = self.snapshot(&instance)?;
        for write in &writes {
            if let Some(control) = snapshot.controls.iter_mut().find(|c| c.id == write.control_id) {
                apply_write(control, write);
            }
        }
        let assessment = self.score(&instance, &snapshot)?;

        self.reported(self.store.apply_attestations(&writes))?;
        edits.discard();

        tracing::info!(
            pci_instance_id = %instance.id,
            updated_controls = writes.len(),
            "saved attestations"
        );
        self.dispatcher.emit_attestations_saved(&AttestationsSavedEvent {
            pci_instance_id: instance.id.clone(),
            updated_controls: writes.len(),
        });
        self.emit_recomputed(&assessment);
        Ok(assessment)
    }

    // ---- Scoring ----

    /// Recompute DIME, effectiveness and confidence from committed state.
    /// Read-only and idempotent.
    pub fn assess(&self, pci_instance_id: &str) -> AssuranceResult<Assessment> {
        let instance = self.pci_instance(pci_instance_id)?;
        self.assess_instance(&instance)
    }

    fn assess_instance(&self, instance: &PciInstance) -> AssuranceResult<Assessment> {
        let snapshot = self.snapshot(instance)?;
        self.score(instance, &snapshot)
    }

    /// Everything scoring reads for one instance.
    fn snapshot(&self, instance: &PciInstance) -> AssuranceResult<ScoringSnapshot> {
        Ok(ScoringSnapshot {
            controls: self.reported(self.store.list_controls(&instance.id))?,
            templates: self.templates()?,
            requests: self.reported(self.store.list_evidence_requests(&instance.risk_id))?,
        })
    }

    fn score(&self, instance: &PciInstance, snapshot: &ScoringSnapshot) -> AssuranceResult<Assessment> {
        let started = Instant::now();
        let attested = self.reported(
            join_controls(&snapshot.controls, &snapshot.templates).map_err(Into::into),
        )?;

        let dime = self.reported(compute_dime(&attested).map_err(Into::into))?;
        let effectiveness = normalize(&dime);

        let relevant = relevant_requests(instance, &snapshot.requests);
        let inputs = ConfidenceInputs::gather(&attested, &relevant, self.clock.today());
        let confidence = self.scorer.score(&inputs, self.clock.now());

        tracing::debug!(
            pci_instance_id = %instance.id,
            effectiveness_percent = ?effectiveness.percent(),
            confidence_score = confidence.confidence_score,
            elapsed_us = started.elapsed().as_micros() as u64,
            "assessed PCI instance"
        );

        Ok(Assessment {
            pci_instance_id: instance.id.clone(),
            dime,
            effectiveness,
            confidence,
        })
    }

    fn emit_recomputed(&self, assessment: &Assessment) {
        self.dispatcher.emit_scores_recomputed(&ScoresRecomputedEvent {
            pci_instance_id: assessment.pci_instance_id.clone(),
            effectiveness_percent: assessment.effectiveness.percent(),
            confidence_score: assessment.confidence.confidence_score,
            confidence_label: assessment.confidence.confidence_label,
        });
    }

    /// Recompute every PCI instance an evidence request feeds.
    ///
    /// Runs after the request change has committed. A failure here is
    /// reported to handlers but does not undo or fail the committed change;
    /// the next `assess` recomputes from the same state.
    fn recompute_for_request(&self, request: &EvidenceRequest) {
        let instances = match &request.pci_instance_id {
            Some(pci_instance_id) => self.pci_instance(pci_instance_id).map(|i| vec![i]),
            None => self.pci_instances_for_risk(&request.risk_id).map(|all| {
                all.into_iter()
                    .filter(|i| i.status != PciStatus::Retired)
                    .collect()
            }),
        };
        let Ok(instances) = instances else {
            return;
        };
        for instance in &instances {
            if let Ok(assessment) = self.assess_instance(instance) {
                self.emit_recomputed(&assessment);
            }
        }
    }

    // ---- Evidence ----

    /// Create an `open` request against a PCI instance, a control, or a risk.
    pub fn create_evidence_request(&self, new: NewEvidenceRequest) -> AssuranceResult<EvidenceRequest> {
        let (risk_id, pci_instance_id) = match &new.target {
            EvidenceTarget::PciInstance(id) => {
                let instance = self.pci_instance(id)?;
                self.ensure_editable(&instance)?;
                (instance.risk_id, Some(instance.id))
            }
            EvidenceTarget::SecondaryControl(id) => {
                let control = match self.reported(self.store.get_control(id))? {
                    Some(control) => control,
                    None => return self.fail(NotFoundError::ControlInstance(id.clone())),
                };
                let instance = self.pci_instance(&control.pci_instance_id)?;
                self.ensure_editable(&instance)?;
                (instance.risk_id, Some(instance.id))
            }
            EvidenceTarget::Risk(id) => {
                if id.trim().is_empty() {
                    return self.fail(ValidationError::InvalidField {
                        field: "target.risk_id",
                        message: "must not be empty".to_string(),
                    });
                }
                (id.clone(), None)
            }
        };

        let now = self.clock.now();
        let request = self.reported(
            self.workflow
                .create_request(new, risk_id, pci_instance_id, now)
                .map_err(Into::into),
        )?;
        self.reported(self.store.insert_evidence_request(&request))?;

        tracing::info!(
            evidence_request_id = %request.id,
            target = request.target.kind(),
            due_date = %request.due_date,
            critical_scope = request.is_critical_scope,
            "created evidence request"
        );
        self.recompute_for_request(&request);
        Ok(request)
    }

    pub fn submit_evidence(&self, request_id: &str, note: impl Into<String>) -> AssuranceResult<EvidenceRequest> {
        self.transition(request_id, EvidenceAction::Submit { note: note.into() })
    }

    pub fn review_evidence(
        &self,
        request_id: &str,
        decision: ReviewDecision,
        review_notes: Option<String>,
    ) -> AssuranceResult<EvidenceRequest> {
        self.transition(
            request_id,
            EvidenceAction::Review {
                decision,
                review_notes,
            },
        )
    }

    pub fn cancel_evidence_request(&self, request_id: &str) -> AssuranceResult<EvidenceRequest> {
        self.transition(request_id, EvidenceAction::Cancel)
    }

    pub fn close_evidence_request(&self, request_id: &str) -> AssuranceResult<EvidenceRequest> {
        self.transition(request_id, EvidenceAction::Close)
    }

    fn transition(&self, request_id: &str, action: EvidenceAction) -> AssuranceResult<EvidenceRequest> {
        let mut request = self.evidence_request(request_id)?;
        let current = self
            .reported(self.store.list_submissions(request_id))?
            .pop();

        let commit = self.reported(self.workflow.plan(&request, current.as_ref(), action, self.clock.now()))?;
        self.reported(self.store.commit_evidence_transition(&commit))?;
        EvidenceWorkflow::apply(&mut request, &commit);

        tracing::info!(
            evidence_request_id = %request.id,
            from = %commit.from,
            to = %commit.to,
            "evidence request transitioned"
        );
        self.dispatcher.emit_evidence_transition(&EvidenceTransitionEvent {
            request_id: request.id.clone(),
            from: commit.from,
            to: commit.to,
        });

        self.recompute_for_request(&request);
        Ok(request)
    }

    pub fn evidence_request(&self, request_id: &str) -> AssuranceResult<EvidenceRequest> {
        match self.reported(self.store.get_evidence_request(request_id))? {
            Some(request) => Ok(request),
            None => self.fail(NotFoundError::EvidenceRequest(request_id.to_string())),
        }
    }

    /// Requests feeding a PCI instance's confidence, cancelled ones included.
    pub fn evidence_requests_for(&self, pci_instance_id: &str) -> AssuranceResult<Vec<EvidenceRequest>> {
        let instance = self.pci_instance(pci_instance_id)?;
        let requests = self.reported(self.store.list_evidence_requests(&instance.risk_id))?;
        Ok(relevant_requests(&instance, &requests)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Submissions of a request, oldest first. The last one is current.
    pub fn submissions(&self, request_id: &str) -> AssuranceResult<Vec<EvidenceSubmission>> {
        self.evidence_request(request_id)?;
        self.reported(self.store.list_submissions(request_id))
    }

    /// Whether a request is overdue as of the engine's clock.
    pub fn is_overdue(&self, request: &EvidenceRequest) -> bool {
        request.is_overdue(self.clock.today())
    }

    // ---- Risk responses & activation ----

    /// Declare (or replace) the single treatment of a risk.
    pub fn set_risk_response(
        &self,
        risk_id: &str,
        response_type: ResponseType,
        rationale: Option<String>,
        ai_proposed: Option<AiProposedResponse>,
    ) -> AssuranceResult<RiskResponse> {
        let response = RiskResponse {
            risk_id: risk_id.to_string(),
            response_type,
            rationale: rationale.filter(|r| !r.trim().is_empty()),
            ai_proposed,
            updated_at: self.clock.now(),
        };
        self.reported(self.store.upsert_risk_response(&response))?;
        tracing::info!(risk_id, response_type = %response_type, "risk response declared");
        Ok(response)
    }

    pub fn risk_response(&self, risk_id: &str) -> AssuranceResult<Option<RiskResponse>> {
        self.reported(self.store.get_risk_response(risk_id))
    }

    /// Evaluate the activation gate for a risk.
    pub fn activation_gate(&self, risk_id: &str) -> AssuranceResult<ActivationDecision> {
        let response = self.risk_response(risk_id)?;
        let summaries = self.attestation_summaries(risk_id)?;
        let decision = ActivationGate::evaluate(response.as_ref(), &summaries);

        tracing::info!(
            risk_id,
            can_activate = decision.can_activate,
            pci_count = decision.pci_count,
            complete_pci_count = decision.complete_pci_count,
            "activation gate evaluated"
        );
        self.dispatcher.emit_activation_evaluated(&ActivationEvaluatedEvent {
            risk_id: risk_id.to_string(),
            can_activate: decision.can_activate,
            response_type: decision.response_type,
        });
        Ok(decision)
    }

    fn attestation_summaries(&self, risk_id: &str) -> AssuranceResult<Vec<PciAttestationSummary>> {
        self.pci_instances_for_risk(risk_id)?
            .iter()
            .map(|instance| {
                let controls = self.reported(self.store.list_controls(&instance.id))?;
                Ok(PciAttestationSummary::from_controls(instance, &controls))
            })
            .collect()
    }

    /// Commit a draft instance to active.
    pub fn activate_pci(&self, pci_instance_id: &str) -> AssuranceResult<PciInstance> {
        let instance = self.pci_instance(pci_instance_id)?;
        let controls = self.reported(self.store.list_controls(&instance.id))?;
        let summary = PciAttestationSummary::from_controls(&instance, &controls);
        let response = self.risk_response(&instance.risk_id)?;
        self.reported(
            ActivationGate::check_instance_activation(&instance, &summary, response.as_ref())
                .map_err(Into::into),
        )?;
        self.change_status(instance, PciStatus::Active)
    }

    /// Retire an active instance. Its history stays readable.
    pub fn retire_pci(&self, pci_instance_id: &str) -> AssuranceResult<PciInstance> {
        let instance = self.pci_instance(pci_instance_id)?;
        self.reported(ActivationGate::check_instance_retirement(&instance).map_err(Into::into))?;
        self.change_status(instance, PciStatus::Retired)
    }

    fn change_status(&self, mut instance: PciInstance, to: PciStatus) -> AssuranceResult<PciInstance> {
        let from = instance.status;
        let at: DateTime<Utc> = self.clock.now();
        self.reported(self.store.update_pci_status(&instance.id, from, to, at))?;

        instance.status = to;
        match to {
            PciStatus::Active => instance.activated_at = Some(at),
            PciStatus::Retired => instance.retired_at = Some(at),
            PciStatus::Draft => {}
        }

        tracing::info!(
            pci_instance_id = %instance.id,
            from = %from,
            to = %to,
            "PCI instance status changed"
        );
        self.dispatcher.emit_pci_status_changed(&PciStatusChangedEvent {
            pci_instance_id: instance.id.clone(),
            from,
            to,
        });
        Ok(instance)
    }

    // ---- Helpers ----

    fn ensure_editable(&self, instance: &PciInstance) -> AssuranceResult<()> {
        if instance.status == PciStatus::Retired {
            return self.fail(ValidationError::InvalidTransition {
                entity: "PCI instance",
                action: "modify",
                state: instance.status.to_string(),
            });
        }
        Ok(())
    }

    /// Report a failed result to event handlers and pass it through.
    fn reported<T>(&self, result: AssuranceResult<T>) -> AssuranceResult<T> {
        if let Err(err) = &result {
            tracing::warn!(error_code = err.error_code(), error = %err, "assurance operation failed");
            self.dispatcher.emit_error(&ErrorEvent {
                message: err.to_string(),
                error_code: err.error_code().to_string(),
            });
        }
        result
    }

    fn fail<T>(&self, err: impl Into<assurance_core::errors::AssuranceError>) -> AssuranceResult<T> {
        self.reported(Err(err.into()))
    }
}
