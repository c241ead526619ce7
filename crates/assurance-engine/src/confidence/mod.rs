//! Confidence Scorer: assurance signals → 0-100 score, label, ordered drivers.

pub mod inputs;
pub mod scorer;

pub use inputs::{relevant_requests, ConfidenceInputs};
pub use scorer::ConfidenceScorer;
