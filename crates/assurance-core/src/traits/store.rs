//! AssuranceStore trait: the persistence seam.
//!
//! Every method is one atomic unit: it either fully succeeds or leaves the
//! store untouched. Implementations surface failures as
//! `PersistenceError`, stale writes as `ConflictError`, and unparseable
//! stored vocabulary as `DomainError`.

use chrono::{DateTime, Utc};

use crate::errors::AssuranceResult;
use crate::models::{
    AttestationStatus, EvidenceCommit, EvidenceRequest, EvidenceSubmission, PciInstance,
    PciStatus, RiskResponse, SecondaryControlInstance, SecondaryControlTemplate,
};

/// One control update of an attestation save.
#[derive(Debug, Clone, PartialEq)]
pub struct AttestationWrite {
    pub control_id: String,
    /// Version the edit was based on; the write fails if the stored one differs.
    pub expected_version: u64,
    pub status: AttestationStatus,
    pub evidence_exists: bool,
    pub notes: Option<String>,
    pub na_rationale: Option<String>,
    pub attested_at: Option<DateTime<Utc>>,
}

pub trait AssuranceStore: Send + Sync {
    // ---- Template catalog ----
    fn insert_templates(&self, templates: &[SecondaryControlTemplate]) -> AssuranceResult<()>;
    fn list_templates(&self) -> AssuranceResult<Vec<SecondaryControlTemplate>>;

    // ---- PCI instances ----
    /// Insert an instance together with its control set.
    fn create_pci_instance(
        &self,
        instance: &PciInstance,
        controls: &[SecondaryControlInstance],
    ) -> AssuranceResult<()>;
    fn get_pci_instance(&self, id: &str) -> AssuranceResult<Option<PciInstance>>;
    fn list_pci_instances(&self, risk_id: &str) -> AssuranceResult<Vec<PciInstance>>;
    /// Move an instance to `to` if it is still in `from`.
    fn update_pci_status(
        &self,
        id: &str,
        from: PciStatus,
        to: PciStatus,
        at: DateTime<Utc>,
    ) -> AssuranceResult<()>;

    // ---- Attestations ----
    fn list_controls(&self, pci_instance_id: &str) -> AssuranceResult<Vec<SecondaryControlInstance>>;
    fn get_control(&self, id: &str) -> AssuranceResult<Option<SecondaryControlInstance>>;
    /// Apply all writes or none; bumps each control's version.
    fn apply_attestations(&self, writes: &[AttestationWrite]) -> AssuranceResult<()>;

    // ---- Evidence ----
    fn insert_evidence_request(&self, request: &EvidenceRequest) -> AssuranceResult<()>;
    fn get_evidence_request(&self, id: &str) -> AssuranceResult<Option<EvidenceRequest>>;
    /// Every request whose resolved risk is `risk_id`.
    fn list_evidence_requests(&self, risk_id: &str) -> AssuranceResult<Vec<EvidenceRequest>>;
    /// Submissions of a request, oldest first.
    fn list_submissions(&self, request_id: &str) -> AssuranceResult<Vec<EvidenceSubmission>>;
    fn commit_evidence_transition(&self, commit: &EvidenceCommit) -> AssuranceResult<()>;

    // ---- Risk responses ----
    fn get_risk_response(&self, risk_id: &str) -> AssuranceResult<Option<RiskResponse>>;
    fn upsert_risk_response(&self, response: &RiskResponse) -> AssuranceResult<()>;
}
