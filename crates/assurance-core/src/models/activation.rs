use serde::{Deserialize, Serialize};

use super::vocabulary::ResponseType;

/// Outcome of the activation gate for one risk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationDecision {
    pub can_activate: bool,
    pub response_type: Option<ResponseType>,
    /// Non-retired PCI instances protecting the risk.
    pub pci_count: usize,
    /// Of those, how many are fully attested.
    pub complete_pci_count: usize,
    /// Why the gate failed; `None` when it passes.
    pub validation_message: Option<String>,
}
