use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::attestation::SecondaryControlInstance;
use super::vocabulary::{ControlObjective, PciStatus};

/// One control deployed against one risk.
///
/// Derived scores are not stored here; they are recomputed from the
/// attestation set on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PciInstance {
    pub id: String,
    pub risk_id: String,
    pub name: String,
    pub objective: ControlObjective,
    pub status: PciStatus,
    pub created_at: DateTime<Utc>,
    pub activated_at: Option<DateTime<Utc>>,
    pub retired_at: Option<DateTime<Utc>>,
}

/// Attestation completeness of one PCI instance, as seen by the activation gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PciAttestationSummary {
    pub pci_instance_id: String,
    pub status: PciStatus,
    pub total_controls: usize,
    pub attested_controls: usize,
}

impl PciAttestationSummary {
    pub fn from_controls(instance: &PciInstance, controls: &[SecondaryControlInstance]) -> Self {
        Self {
            pci_instance_id: instance.id.clone(),
            status: instance.status,
            total_controls: controls.len(),
            attested_controls: controls.iter().filter(|c| c.is_attested()).count(),
        }
    }

    /// Every control attested. An instance with no controls is never complete.
    pub fn is_complete(&self) -> bool {
        self.total_controls > 0 && self.attested_controls == self.total_controls
    }

    /// Fraction attested in [0, 1].
    pub fn completeness(&self) -> f64 {
        if self.total_controls == 0 {
            return 0.0;
        }
        self.attested_controls as f64 / self.total_controls as f64
    }
}
