//! Signal extraction for the confidence scorer.

use chrono::NaiveDate;

use assurance_core::models::{AttestedControl, Criticality, EvidenceRequest, EvidenceStatus, PciInstance};

/// Counts the scorer works from. Built once per recomputation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfidenceInputs {
    pub total_controls: usize,
    pub attested_controls: usize,
    /// Critical controls answered `yes` or `partial`.
    pub critical_claimed: usize,
    /// Of those, how many have no evidence.
    pub critical_missing_evidence: usize,
    pub overdue_requests: usize,
    /// Open or rejected, not yet overdue.
    pub outstanding_requests: usize,
    pub pending_review: usize,
    /// Accepted or closed.
    pub accepted_requests: usize,
    pub critical_scope_accepted: usize,
    pub critical_scope_rejected: usize,
}

impl ConfidenceInputs {
    /// Derive the inputs from a PCI instance's controls and the evidence
    /// requests that feed it. Cancelled requests are ignored.
    pub fn gather(
        controls: &[AttestedControl],
        requests: &[&EvidenceRequest],
        today: NaiveDate,
    ) -> Self {
        let mut inputs = Self {
            total_controls: controls.len(),
            attested_controls: controls.iter().filter(|c| c.status.is_attested()).count(),
            ..Self::default()
        };

        for control in controls
            .iter()
            .filter(|c| c.criticality == Criticality::Critical && c.status.claims_operation())
        {
            inputs.critical_claimed += 1;
            if !control.has_evidence() {
                inputs.critical_missing_evidence += 1;
            }
        }

        for request in requests {
            if request.status == EvidenceStatus::Cancelled {
                continue;
            }
            if request.is_overdue(today) {
                inputs.overdue_requests += 1;
            } else if request.status.awaits_submission() {
                inputs.outstanding_requests += 1;
            }
            match request.status {
                EvidenceStatus::Submitted => inputs.pending_review += 1,
                EvidenceStatus::Accepted | EvidenceStatus::Closed => {
                    inputs.accepted_requests += 1;
                    if request.is_critical_scope {
                        inputs.critical_scope_accepted += 1;
                    }
                }
                EvidenceStatus::Rejected if request.is_critical_scope => {
                    inputs.critical_scope_rejected += 1;
                }
                _ => {}
            }
        }

        inputs
    }

    pub fn missing_controls(&self) -> usize {
        self.total_controls - self.attested_controls
    }

    pub fn attestation_complete(&self) -> bool {
        self.total_controls > 0 && self.attested_controls == self.total_controls
    }
}

/// Requests that feed one PCI instance: those it owns (PCI- or
/// control-targeted) plus risk-level requests of its risk.
pub fn relevant_requests<'a>(
    instance: &PciInstance,
    requests: &'a [EvidenceRequest],
) -> Vec<&'a EvidenceRequest> {
    requests
        .iter()
        .filter(|r| match &r.pci_instance_id {
            Some(owner) => *owner == instance.id,
            None => r.risk_id == instance.risk_id,
        })
        .collect()
}
