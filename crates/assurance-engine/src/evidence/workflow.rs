//! Transition guards and commit planning for evidence requests.
//!
//! The workflow never writes. `plan` validates an action against the
//! current request and returns an `EvidenceCommit` that the store applies
//! atomically, re-checking that the request is still in the planned `from`
//! state.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use assurance_core::config::EvidenceConfig;
use assurance_core::errors::{AssuranceResult, DomainError, ValidationError};
use assurance_core::models::{
    EvidenceCommit, EvidenceRequest, EvidenceStatus, EvidenceSubmission, EvidenceTarget,
    ReviewDecision, SubmissionWrite,
};

/// Input for creating a request.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvidenceRequest {
    pub target: EvidenceTarget,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub is_critical_scope: bool,
}

impl NewEvidenceRequest {
    pub fn new(target: EvidenceTarget, due_date: NaiveDate) -> Self {
        Self {
            target,
            due_date: Some(due_date),
            notes: None,
            is_critical_scope: false,
        }
    }

    pub fn critical_scope(mut self) -> Self {
        self.is_critical_scope = true;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A requested transition.
#[derive(Debug, Clone, PartialEq)]
pub enum EvidenceAction {
    Submit { note: String },
    Review {
        decision: ReviewDecision,
        review_notes: Option<String>,
    },
    Cancel,
    Close,
}

impl EvidenceAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Submit { .. } => "submit",
            Self::Review { .. } => "review",
            Self::Cancel => "cancel",
            Self::Close => "close",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EvidenceWorkflow {
    default_due_days: Option<u32>,
    require_submission_note: bool,
}

impl EvidenceWorkflow {
    pub fn new(config: &EvidenceConfig) -> Self {
        Self {
            default_due_days: config.default_due_days,
            require_submission_note: config.effective_require_submission_note(),
        }
    }

    /// Build a new `open` request. The caller resolves which risk and PCI
    /// instance the target belongs to.
    pub fn create_request(
        &self,
        new: NewEvidenceRequest,
        risk_id: String,
        pci_instance_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<EvidenceRequest, ValidationError> {
        let due_date = match (new.due_date, self.default_due_days) {
            (Some(date), _) => date,
            (None, Some(days)) => now.date_naive() + Duration::days(i64::from(days)),
            (None, None) => return Err(ValidationError::MissingDueDate),
        };

        Ok(EvidenceRequest {
            id: Uuid::new_v4().to_string(),
            target: new.target,
            risk_id,
            pci_instance_id,
            status: EvidenceStatus::Open,
            due_date,
            is_critical_scope: new.is_critical_scope,
            notes: new.notes.filter(|n| !n.trim().is_empty()),
            created_at: now,
            updated_at: now,
        })
    }

    /// Target state of `action` from `from`, or `None` if the transition is illegal.
    pub fn can_transition(from: EvidenceStatus, action: &EvidenceAction) -> Option<EvidenceStatus> {
        use EvidenceStatus::*;
        match (from, action) {
            (Open | Rejected, EvidenceAction::Submit { .. }) => Some(Submitted),
            (Submitted, EvidenceAction::Review { decision, .. }) => Some(match decision {
                ReviewDecision::Accepted => Accepted,
                ReviewDecision::Rejected => Rejected,
            }),
            (Open | Rejected, EvidenceAction::Cancel) => Some(Cancelled),
            (Accepted, EvidenceAction::Close) => Some(Closed),
            _ => None,
        }
    }

    /// Validate `action` and plan the resulting commit.
    ///
    /// `current` is the latest submission of the request, if any; a review
    /// needs it to be pending.
    pub fn plan(
        &self,
        request: &EvidenceRequest,
        current: Option<&EvidenceSubmission>,
        action: EvidenceAction,
        now: DateTime<Utc>,
    ) -> AssuranceResult<EvidenceCommit> {
        let to = Self::can_transition(request.status, &action).ok_or_else(|| {
            ValidationError::InvalidTransition {
                entity: "evidence request",
                action: action.name(),
                state: request.status.to_string(),
            }
        })?;

        let submission = match action {
            EvidenceAction::Submit { note } => {
                let note = note.trim().to_string();
                if self.require_submission_note && note.is_empty() {
                    return Err(ValidationError::MissingSubmissionNote.into());
                }
                Some(SubmissionWrite::Insert(EvidenceSubmission {
                    id: Uuid::new_v4().to_string(),
                    request_id: request.id.clone(),
                    submission_note: note,
                    decision: None,
                    review_notes: None,
                    submitted_at: now,
                    reviewed_at: None,
                }))
            }
            EvidenceAction::Review {
                decision,
                review_notes,
            } => {
                let review_notes = review_notes
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty());
                if decision == ReviewDecision::Rejected && review_notes.is_none() {
                    return Err(ValidationError::MissingReviewNotes.into());
                }
                let current = current.filter(|s| s.is_pending_review()).ok_or_else(|| {
                    DomainError::InconsistentEvidence(format!(
                        "request {} is submitted but has no submission pending review",
                        request.id
                    ))
                })?;
                Some(SubmissionWrite::Decide {
                    submission_id: current.id.clone(),
                    decision,
                    review_notes,
                    reviewed_at: now,
                })
            }
            EvidenceAction::Cancel | EvidenceAction::Close => None,
        };

        Ok(EvidenceCommit {
            request_id: request.id.clone(),
            from: request.status,
            to,
            at: now,
            submission,
        })
    }

    /// Apply a committed transition to an in-memory copy of the request.
    pub fn apply(request: &mut EvidenceRequest, commit: &EvidenceCommit) {
        request.status = commit.to;
        request.updated_at = commit.at;
    }
}
