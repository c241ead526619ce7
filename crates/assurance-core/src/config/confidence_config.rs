//! Confidence scoring configuration, including the driver point table.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CONFIDENCE_HIGH, DEFAULT_CONFIDENCE_MEDIUM};

/// Point weights per confidence driver.
///
/// Negative entries are written as negative numbers; `*_floor` and `*_cap`
/// bound the total a repeated driver can contribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceWeights {
    /// Starting score before any driver is applied.
    pub baseline: i32,
    pub attestation_complete: i32,
    /// Applied scaled by the fraction of controls still unattested.
    pub attestation_incomplete: i32,
    pub critical_evidence_present: i32,
    pub critical_evidence_missing_each: i32,
    pub critical_evidence_missing_floor: i32,
    pub evidence_overdue_each: i32,
    pub evidence_overdue_floor: i32,
    pub evidence_outstanding_each: i32,
    pub evidence_outstanding_floor: i32,
    pub evidence_accepted_each: i32,
    pub evidence_accepted_cap: i32,
    pub critical_scope_accepted_each: i32,
    pub critical_scope_accepted_cap: i32,
    pub critical_scope_rejected_each: i32,
    pub critical_scope_rejected_floor: i32,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            baseline: 50,
            attestation_complete: 20,
            attestation_incomplete: -20,
            critical_evidence_present: 15,
            critical_evidence_missing_each: -8,
            critical_evidence_missing_floor: -24,
            evidence_overdue_each: -10,
            evidence_overdue_floor: -30,
            evidence_outstanding_each: -2,
            evidence_outstanding_floor: -6,
            evidence_accepted_each: 5,
            evidence_accepted_cap: 15,
            critical_scope_accepted_each: 3,
            critical_scope_accepted_cap: 9,
            critical_scope_rejected_each: -6,
            critical_scope_rejected_floor: -18,
        }
    }
}

impl ConfidenceWeights {
    /// Returns the name of the first entry whose sign contradicts its driver.
    pub fn first_sign_violation(&self) -> Option<&'static str> {
        let positives = [
            ("attestation_complete", self.attestation_complete),
            ("critical_evidence_present", self.critical_evidence_present),
            ("evidence_accepted_each", self.evidence_accepted_each),
            ("evidence_accepted_cap", self.evidence_accepted_cap),
            ("critical_scope_accepted_each", self.critical_scope_accepted_each),
            ("critical_scope_accepted_cap", self.critical_scope_accepted_cap),
        ];
        let negatives = [
            ("attestation_incomplete", self.attestation_incomplete),
            ("critical_evidence_missing_each", self.critical_evidence_missing_each),
            ("critical_evidence_missing_floor", self.critical_evidence_missing_floor),
            ("evidence_overdue_each", self.evidence_overdue_each),
            ("evidence_overdue_floor", self.evidence_overdue_floor),
            ("evidence_outstanding_each", self.evidence_outstanding_each),
            ("evidence_outstanding_floor", self.evidence_outstanding_floor),
            ("critical_scope_rejected_each", self.critical_scope_rejected_each),
            ("critical_scope_rejected_floor", self.critical_scope_rejected_floor),
        ];
        positives
            .iter()
            .find(|(_, v)| *v <= 0)
            .or_else(|| negatives.iter().find(|(_, v)| *v >= 0))
            .map(|(name, _)| *name)
    }
}

/// Declares `ConfidenceWeightOverrides` with one optional entry per weight.
macro_rules! weight_overrides {
    ($($field:ident),+ $(,)?) => {
        /// The `[confidence.weights]` table as written in one config layer.
        /// Unset entries fall through to lower layers, then to the defaults.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
        #[serde(default)]
        pub struct ConfidenceWeightOverrides {
            $(
                #[serde(skip_serializing_if = "Option::is_none")]
                pub $field: Option<i32>,
            )+
        }

        impl ConfidenceWeightOverrides {
            /// Take every entry `other` sets.
            pub fn merge_from(&mut self, other: &ConfidenceWeightOverrides) {
                $(if other.$field.is_some() {
                    self.$field = other.$field;
                })+
            }

            /// Overrides applied on top of the compiled defaults.
            pub fn resolve(&self) -> ConfidenceWeights {
                let mut weights = ConfidenceWeights::default();
                $(if let Some(value) = self.$field {
                    weights.$field = value;
                })+
                weights
            }
        }
    };
}

weight_overrides!(
    baseline,
    attestation_complete,
    attestation_incomplete,
    critical_evidence_present,
    critical_evidence_missing_each,
    critical_evidence_missing_floor,
    evidence_overdue_each,
    evidence_overdue_floor,
    evidence_outstanding_each,
    evidence_outstanding_floor,
    evidence_accepted_each,
    evidence_accepted_cap,
    critical_scope_accepted_each,
    critical_scope_accepted_cap,
    critical_scope_rejected_each,
    critical_scope_rejected_floor,
);

/// Configuration for the confidence scorer.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConfidenceConfig {
    /// Lower bound of the "high" label. Default: 90.
    pub high_threshold: Option<u32>,
    /// Lower bound of the "medium" label. Default: 70.
    pub medium_threshold: Option<u32>,
    pub weights: ConfidenceWeightOverrides,
}

impl ConfidenceConfig {
    pub fn effective_high_threshold(&self) -> u32 {
        self.high_threshold.unwrap_or(DEFAULT_CONFIDENCE_HIGH)
    }

    pub fn effective_medium_threshold(&self) -> u32 {
        self.medium_threshold.unwrap_or(DEFAULT_CONFIDENCE_MEDIUM)
    }

    pub fn effective_weights(&self) -> ConfidenceWeights {
        self.weights.resolve()
    }
}
