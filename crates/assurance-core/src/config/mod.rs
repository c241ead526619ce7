//! Configuration system for the assurance engine.
//! TOML-based, layered resolution: env > project > user > defaults.

pub mod assurance_config;
pub mod confidence_config;
pub mod evidence_config;
pub mod storage_config;
pub mod telemetry_config;

pub use assurance_config::AssuranceConfig;
pub use confidence_config::{ConfidenceConfig, ConfidenceWeightOverrides, ConfidenceWeights};
pub use evidence_config::EvidenceConfig;
pub use storage_config::StorageConfig;
pub use telemetry_config::TelemetryConfig;
