//! # assurance-core
//!
//! Foundation crate for the control assurance engine.
//! Defines the closed vocabulary, data model, errors, config, events,
//! tracing setup, and the store/clock traits. Every other crate in the
//! workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod models;
pub mod tracing;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::AssuranceConfig;
pub use errors::{AssuranceError, AssuranceResult};
pub use models::{
    AttestationStatus, Criticality, Dimension, EvidenceStatus, PciStatus, ResponseType,
};
