//! Data model for control assurance.

pub mod activation;
pub mod attestation;
pub mod confidence;
pub mod dime_score;
pub mod evidence;
pub mod pci;
pub mod risk_response;
pub mod suggestion;
pub mod vocabulary;

pub use activation::ActivationDecision;
pub use attestation::{AttestedControl, SecondaryControlInstance, SecondaryControlTemplate};
pub use confidence::{ConfidenceDriver, ConfidenceScore, DriverType};
pub use dime_score::{
    CalcTrace, CapDetails, ConstrainedBy, ControlTrace, DerivedDimeScore, DimensionCap,
    DimensionTrace, Effectiveness, ExclusionReason,
};
pub use evidence::{
    EvidenceCommit, EvidenceRequest, EvidenceSubmission, EvidenceTarget, SubmissionWrite,
};
pub use pci::{PciAttestationSummary, PciInstance};
pub use risk_response::{AiProposedResponse, RiskResponse};
pub use suggestion::{TemplateRecommendation, TemplateSuggestion};
pub use vocabulary::{
    AttestationStatus, ConfidenceLabel, ControlObjective, Criticality, Dimension, DriverKind,
    EffectivenessLabel, EvidenceStatus, PciStatus, ResponseType, ReviewDecision,
};
