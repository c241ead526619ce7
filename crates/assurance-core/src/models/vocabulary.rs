//! Closed vocabularies. Wire strings must match exactly for compatibility
//! with stored records and external callers.

use serde::{Deserialize, Serialize};

use crate::constants::{EFFECTIVENESS_MODERATE, EFFECTIVENESS_STRONG, EFFECTIVENESS_WEAK, DIMENSION_MAX};
use crate::errors::DomainError;

/// Generates `as_str`, `all`, `Display` and a `FromStr` that fails with
/// `DomainError::UnknownEnumValue` for anything outside the vocabulary.
macro_rules! wire_vocabulary {
    ($ty:ident, $kind:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            pub fn all() -> &'static [$ty] {
                &[$(Self::$variant,)+]
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(DomainError::UnknownEnumValue {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

/// The four DIME effectiveness dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dimension {
    #[serde(rename = "D")]
    Design,
    #[serde(rename = "I")]
    Implementation,
    #[serde(rename = "M")]
    Monitoring,
    #[serde(rename = "E")]
    Evaluation,
}

wire_vocabulary!(Dimension, "dimension", {
    Design => "D",
    Implementation => "I",
    Monitoring => "M",
    Evaluation => "E",
});

impl Dimension {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Design => "Design",
            Self::Implementation => "Implementation",
            Self::Monitoring => "Monitoring",
            Self::Evaluation => "Evaluation",
        }
    }
}

/// Importance tier of a secondary control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criticality {
    Critical,
    Important,
    Optional,
}

wire_vocabulary!(Criticality, "criticality", {
    Critical => "critical",
    Important => "important",
    Optional => "optional",
});

impl Criticality {
    /// Aggregation weight: critical 3, important 2, optional 1.
    pub fn weight(&self) -> u32 {
        match self {
            Self::Critical => 3,
            Self::Important => 2,
            Self::Optional => 1,
        }
    }
}

/// Answer recorded against one secondary control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttestationStatus {
    Yes,
    Partial,
    No,
    Na,
    NotAttested,
}

wire_vocabulary!(AttestationStatus, "attestation status", {
    Yes => "yes",
    Partial => "partial",
    No => "no",
    Na => "na",
    NotAttested => "not_attested",
});

impl AttestationStatus {
    /// Scoring value: yes 1.0, partial 0.5, no 0.0.
    /// `None` for statuses excluded from totals.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Yes => Some(1.0),
            Self::Partial => Some(0.5),
            Self::No => Some(0.0),
            Self::Na | Self::NotAttested => None,
        }
    }

    /// Anything but `not_attested` counts as attested, including `na`.
    pub fn is_attested(&self) -> bool {
        !matches!(self, Self::NotAttested)
    }

    /// Statuses that assert the control operates, and therefore need evidence.
    pub fn claims_operation(&self) -> bool {
        matches!(self, Self::Yes | Self::Partial)
    }
}

/// Lifecycle of a PCI instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PciStatus {
    Draft,
    Active,
    Retired,
}

wire_vocabulary!(PciStatus, "PCI status", {
    Draft => "draft",
    Active => "active",
    Retired => "retired",
});

/// What a control is meant to reduce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlObjective {
    Likelihood,
    Impact,
    Both,
}

wire_vocabulary!(ControlObjective, "control objective", {
    Likelihood => "likelihood",
    Impact => "impact",
    Both => "both",
});

/// Evidence request state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceStatus {
    Open,
    Submitted,
    Rejected,
    Accepted,
    Cancelled,
    Closed,
}

wire_vocabulary!(EvidenceStatus, "evidence status", {
    Open => "open",
    Submitted => "submitted",
    Rejected => "rejected",
    Accepted => "accepted",
    Cancelled => "cancelled",
    Closed => "closed",
});

impl EvidenceStatus {
    /// States in which the requester is still waiting on the owner.
    pub fn awaits_submission(&self) -> bool {
        matches!(self, Self::Open | Self::Rejected)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Closed)
    }
}

/// Reviewer decision on a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Accepted,
    Rejected,
}

wire_vocabulary!(ReviewDecision, "review decision", {
    Accepted => "accepted",
    Rejected => "rejected",
});

/// Declared risk treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Avoid,
    ReduceLikelihood,
    ReduceImpact,
    TransferShare,
    Accept,
}

wire_vocabulary!(ResponseType, "risk response type", {
    Avoid => "avoid",
    ReduceLikelihood => "reduce_likelihood",
    ReduceImpact => "reduce_impact",
    TransferShare => "transfer_share",
    Accept => "accept",
});

impl ResponseType {
    /// Every treatment except `accept` must be backed by a control.
    pub fn requires_controls(&self) -> bool {
        !matches!(self, Self::Accept)
    }
}

/// Qualitative confidence label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLabel {
    High,
    Medium,
    Low,
}

wire_vocabulary!(ConfidenceLabel, "confidence label", {
    High => "high",
    Medium => "medium",
    Low => "low",
});

/// Qualitative effectiveness band, shared by dimension and aggregate display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectivenessLabel {
    Strong,
    Moderate,
    Weak,
    Critical,
}

wire_vocabulary!(EffectivenessLabel, "effectiveness label", {
    Strong => "strong",
    Moderate => "moderate",
    Weak => "weak",
    Critical => "critical",
});

impl EffectivenessLabel {
    /// Band for a 0-100 percentage. Lower bounds are inclusive.
    pub fn for_percent(percent: f64) -> Self {
        if percent >= EFFECTIVENESS_STRONG {
            Self::Strong
        } else if percent >= EFFECTIVENESS_MODERATE {
            Self::Moderate
        } else if percent >= EFFECTIVENESS_WEAK {
            Self::Weak
        } else {
            Self::Critical
        }
    }

    /// Band for a single 0-3 dimension score, using the same breakpoints.
    pub fn for_dimension_score(score: f64) -> Self {
        Self::for_percent(score / DIMENSION_MAX * 100.0)
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Strong => "green",
            Self::Moderate => "amber",
            Self::Weak => "orange",
            Self::Critical => "red",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Strong => "Strong",
            Self::Moderate => "Moderate",
            Self::Weak => "Weak",
            Self::Critical => "Critical",
        }
    }
}

/// Direction of a confidence driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    Positive,
    Negative,
    Neutral,
}

wire_vocabulary!(DriverKind, "driver kind", {
    Positive => "positive",
    Negative => "negative",
    Neutral => "neutral",
});
