use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::vocabulary::{ConfidenceLabel, DriverKind};

/// The assurance signal a driver was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverType {
    AttestationComplete,
    AttestationIncomplete,
    CriticalEvidencePresent,
    CriticalEvidenceMissing,
    EvidenceOverdue,
    EvidenceOutstanding,
    EvidencePendingReview,
    EvidenceAccepted,
    CriticalScopeAccepted,
    CriticalScopeRejected,
}

/// One signed, explainable contributor to the confidence score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceDriver {
    #[serde(rename = "type")]
    pub kind: DriverKind,
    pub driver: DriverType,
    pub text: String,
    pub points: i32,
}

/// Derived confidence of one PCI instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceScore {
    pub confidence_score: u32,
    pub confidence_label: ConfidenceLabel,
    /// Ordered by absolute impact, largest first.
    pub drivers: Vec<ConfidenceDriver>,
    pub computed_at: DateTime<Utc>,
}

impl ConfidenceScore {
    pub fn negative_drivers(&self) -> impl Iterator<Item = &ConfidenceDriver> {
        self.drivers.iter().filter(|d| d.kind == DriverKind::Negative)
    }

    pub fn positive_drivers(&self) -> impl Iterator<Item = &ConfidenceDriver> {
        self.drivers.iter().filter(|d| d.kind == DriverKind::Positive)
    }

    pub fn driver(&self, driver: DriverType) -> Option<&ConfidenceDriver> {
        self.drivers.iter().find(|d| d.driver == driver)
    }
}
