use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::vocabulary::{AttestationStatus, Criticality, Dimension};

/// Immutable catalog entry. Seeded once, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryControlTemplate {
    pub id: String,
    pub code: String,
    pub dimension: Dimension,
    pub criticality: Criticality,
    pub prompt: String,
    /// Display order within the dimension.
    pub sort_order: u32,
}

/// One attestable answer of a PCI instance.
///
/// Never deleted, only re-attested. `version` increases with every write
/// and is checked on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryControlInstance {
    pub id: String,
    pub pci_instance_id: String,
    pub template_id: String,
    pub status: AttestationStatus,
    /// Meaningless when `status` is `na`.
    pub evidence_exists: bool,
    pub notes: Option<String>,
    /// Required iff `status` is `na`.
    pub na_rationale: Option<String>,
    pub attested_at: Option<DateTime<Utc>>,
    pub version: u64,
}

impl SecondaryControlInstance {
    /// A fresh, unanswered control for a newly instantiated PCI instance.
    pub fn unattested(
        id: impl Into<String>,
        pci_instance_id: impl Into<String>,
        template_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            pci_instance_id: pci_instance_id.into(),
            template_id: template_id.into(),
            status: AttestationStatus::NotAttested,
            evidence_exists: false,
            notes: None,
            na_rationale: None,
            attested_at: None,
            version: 0,
        }
    }

    pub fn is_attested(&self) -> bool {
        self.status.is_attested()
    }
}

/// A control instance joined to its template: the unit the scoring
/// pipeline works on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttestedControl {
    pub instance_id: String,
    pub code: String,
    pub dimension: Dimension,
    pub criticality: Criticality,
    pub status: AttestationStatus,
    pub evidence_exists: bool,
}

impl AttestedControl {
    pub fn new(
        code: impl Into<String>,
        dimension: Dimension,
        criticality: Criticality,
        status: AttestationStatus,
    ) -> Self {
        let code = code.into();
        Self {
            instance_id: code.clone(),
            code,
            dimension,
            criticality,
            status,
            evidence_exists: false,
        }
    }

    pub fn with_evidence(mut self, evidence_exists: bool) -> Self {
        self.evidence_exists = evidence_exists;
        self
    }

    /// Evidence only counts for statuses where it means something.
    pub fn has_evidence(&self) -> bool {
        self.evidence_exists && self.status != AttestationStatus::Na
    }
}
