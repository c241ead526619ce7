//! # assurance-engine
//!
//! Control effectiveness and assurance scoring:
//! - `dime`: weighted dimension aggregation, hard caps, Design cascade,
//!   constrained Evaluation, effectiveness normalization
//! - `confidence`: assurance signals → 0-100 score, label, ordered drivers
//! - `evidence`: request/submission/review state machine
//! - `gate`: draft → active activation decision
//! - `attestation`: pending edits applied atomically on save
//! - `recommendation`: resolves opaque template suggestions
//! - `engine`: facade committing operations through an `AssuranceStore`

pub mod attestation;
pub mod confidence;
pub mod dime;
pub mod engine;
pub mod evidence;
pub mod gate;
pub mod recommendation;

pub use attestation::{AttestationEdit, PendingAttestationEdits};
pub use confidence::{ConfidenceInputs, ConfidenceScorer};
pub use dime::{compute_dime, join_controls, CapCascadeResolver, DimensionAggregator};
pub use engine::{Assessment, AssuranceEngine, NewPciInstance};
pub use evidence::{EvidenceAction, EvidenceWorkflow, NewEvidenceRequest};
pub use gate::ActivationGate;
