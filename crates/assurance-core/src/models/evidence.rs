//! Evidence request/submission records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::vocabulary::{EvidenceStatus, ReviewDecision};

/// What an evidence request is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EvidenceTarget {
    PciInstance(String),
    SecondaryControl(String),
    Risk(String),
}

impl EvidenceTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PciInstance(_) => "pci_instance",
            Self::SecondaryControl(_) => "secondary_control",
            Self::Risk(_) => "risk",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::PciInstance(id) | Self::SecondaryControl(id) | Self::Risk(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRequest {
    pub id: String,
    pub target: EvidenceTarget,
    /// Risk the target belongs to, resolved at creation.
    pub risk_id: String,
    /// Owning PCI instance; `None` for risk-level requests.
    pub pci_instance_id: Option<String>,
    pub status: EvidenceStatus,
    pub due_date: NaiveDate,
    pub is_critical_scope: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EvidenceRequest {
    /// Overdue iff the due date has passed and the owner still has to act.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date < today && self.status.awaits_submission()
    }
}

/// One response to a request. Only the latest submission is current.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSubmission {
    pub id: String,
    pub request_id: String,
    pub submission_note: String,
    pub decision: Option<ReviewDecision>,
    pub review_notes: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl EvidenceSubmission {
    pub fn is_pending_review(&self) -> bool {
        self.decision.is_none()
    }
}

/// Submission side of a transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubmissionWrite {
    Insert(EvidenceSubmission),
    Decide {
        submission_id: String,
        decision: ReviewDecision,
        review_notes: Option<String>,
        reviewed_at: DateTime<Utc>,
    },
}

/// A planned evidence transition, committed atomically by the store.
/// The store rejects it if the request is no longer in `from`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceCommit {
    pub request_id: String,
    pub from: EvidenceStatus,
    pub to: EvidenceStatus,
    pub at: DateTime<Utc>,
    pub submission: Option<SubmissionWrite>,
}
