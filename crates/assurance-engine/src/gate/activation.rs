//! Activation gate evaluation.
//!
//! The gate checks attestation completeness, not score quality: a fully
//! attested but weak control still passes.

use assurance_core::errors::ValidationError;
use assurance_core::models::{
    ActivationDecision, PciAttestationSummary, PciInstance, PciStatus, RiskResponse,
};

pub struct ActivationGate;

impl ActivationGate {
    /// Evaluate the gate for one risk.
    ///
    /// `summaries` covers the risk's PCI instances; retired ones are ignored.
    pub fn evaluate(
        response: Option<&RiskResponse>,
        summaries: &[PciAttestationSummary],
    ) -> ActivationDecision {
        let live: Vec<&PciAttestationSummary> = summaries
            .iter()
            .filter(|s| s.status != PciStatus::Retired)
            .collect();
        let pci_count = live.len();
        let complete_pci_count = live.iter().filter(|s| s.is_complete()).count();

        let Some(response) = response else {
            return ActivationDecision {
                can_activate: false,
                response_type: None,
                pci_count,
                complete_pci_count,
                validation_message: Some("A risk response must be declared before activation".to_string()),
            };
        };

        let validation_message = if !response.response_type.requires_controls() {
            None
        } else if pci_count == 0 {
            Some(format!(
                "Response '{}' requires at least one control instance",
                response.response_type
            ))
        } else if complete_pci_count == 0 {
            Some(format!(
                "None of the {pci_count} control instance(s) is fully attested"
            ))
        } else {
            None
        };

        ActivationDecision {
            can_activate: validation_message.is_none(),
            response_type: Some(response.response_type),
            pci_count,
            complete_pci_count,
            validation_message,
        }
    }

    /// Check whether one instance may be committed draft → active.
    pub fn check_instance_activation(
        instance: &PciInstance,
        summary: &PciAttestationSummary,
        response: Option<&RiskResponse>,
    ) -> Result<(), ValidationError> {
        if instance.status != PciStatus::Draft {
            return Err(ValidationError::InvalidTransition {
                entity: "PCI instance",
                action: "activate",
                state: instance.status.to_string(),
            });
        }
        if response.is_none() {
            return Err(ValidationError::MissingRiskResponse {
                risk_id: instance.risk_id.clone(),
            });
        }
        if !summary.is_complete() {
            return Err(ValidationError::AttestationIncomplete {
                pci_instance_id: instance.id.clone(),
                attested: summary.attested_controls,
                total: summary.total_controls,
            });
        }
        Ok(())
    }

    /// Check whether one instance may be retired.
    pub fn check_instance_retirement(instance: &PciInstance) -> Result<(), ValidationError> {
        if instance.status != PciStatus::Active {
            return Err(ValidationError::InvalidTransition {
                entity: "PCI instance",
                action: "retire",
                state: instance.status.to_string(),
            });
        }
        Ok(())
    }
}
