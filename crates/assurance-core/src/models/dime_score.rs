//! Derived DIME score and its audit trail.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::vocabulary::{AttestationStatus, Criticality, Dimension, EffectivenessLabel};

/// Why a control contributed nothing to its dimension's totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    NotApplicable,
    NotAttested,
}

/// Per-control line of the calculation trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlTrace {
    pub code: String,
    pub criticality: Criticality,
    pub status: AttestationStatus,
    pub weight: u32,
    pub value: Option<f64>,
    pub contribution: f64,
    pub excluded: Option<ExclusionReason>,
}

/// Per-dimension totals plus the controls that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionTrace {
    pub dimension: Dimension,
    pub weighted_sum: f64,
    pub weight_total: u32,
    pub raw_score: f64,
    /// Every control in the dimension was excluded.
    pub no_applicable_controls: bool,
    pub controls: Vec<ControlTrace>,
}

impl DimensionTrace {
    pub fn empty(dimension: Dimension) -> Self {
        Self {
            dimension,
            weighted_sum: 0.0,
            weight_total: 0,
            raw_score: 0.0,
            no_applicable_controls: true,
            controls: Vec::new(),
        }
    }
}

/// Full calculation trace, one entry per dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalcTrace {
    pub design: DimensionTrace,
    pub implementation: DimensionTrace,
    pub monitoring: DimensionTrace,
    pub evaluation: DimensionTrace,
}

impl CalcTrace {
    pub fn get(&self, dimension: Dimension) -> &DimensionTrace {
        match dimension {
            Dimension::Design => &self.design,
            Dimension::Implementation => &self.implementation,
            Dimension::Monitoring => &self.monitoring,
            Dimension::Evaluation => &self.evaluation,
        }
    }

    pub fn get_mut(&mut self, dimension: Dimension) -> &mut DimensionTrace {
        match dimension {
            Dimension::Design => &mut self.design,
            Dimension::Implementation => &mut self.implementation,
            Dimension::Monitoring => &mut self.monitoring,
            Dimension::Evaluation => &mut self.evaluation,
        }
    }

    pub fn raw_score(&self, dimension: Dimension) -> f64 {
        self.get(dimension).raw_score
    }
}

/// Hard-cap outcome for one dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionCap {
    pub capped: bool,
    /// Codes of the critical controls answered `no`.
    pub caps_triggered: SmallVec<[String; 2]>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapDetails {
    pub design: DimensionCap,
    pub implementation: DimensionCap,
    pub monitoring: DimensionCap,
    pub evaluation: DimensionCap,
}

impl CapDetails {
    pub fn get(&self, dimension: Dimension) -> &DimensionCap {
        match dimension {
            Dimension::Design => &self.design,
            Dimension::Implementation => &self.implementation,
            Dimension::Monitoring => &self.monitoring,
            Dimension::Evaluation => &self.evaluation,
        }
    }

    pub fn get_mut(&mut self, dimension: Dimension) -> &mut DimensionCap {
        match dimension {
            Dimension::Design => &mut self.design,
            Dimension::Implementation => &mut self.implementation,
            Dimension::Monitoring => &mut self.monitoring,
            Dimension::Evaluation => &mut self.evaluation,
        }
    }

    /// All triggering codes across dimensions, in D, I, M, E order.
    pub fn caps_triggered(&self) -> Vec<&str> {
        Dimension::all()
            .iter()
            .flat_map(|d| self.get(*d).caps_triggered.iter().map(String::as_str))
            .collect()
    }

    pub fn any_capped(&self) -> bool {
        Dimension::all().iter().any(|d| self.get(*d).capped)
    }
}

/// Which dimension limited the final Evaluation score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstrainedBy {
    #[serde(rename = "D")]
    Design,
    #[serde(rename = "I")]
    Implementation,
    #[serde(rename = "M")]
    Monitoring,
    #[serde(rename = "none")]
    None,
}

impl ConstrainedBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Design => "D",
            Self::Implementation => "I",
            Self::Monitoring => "M",
            Self::None => "none",
        }
    }
}

/// Derived score of one PCI instance. A pure function of the attestation
/// set: never mutated, always recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedDimeScore {
    pub d_score: f64,
    pub i_score: f64,
    pub m_score: f64,
    /// Evaluation after its own cap and the cascade, before the
    /// min-of-others constraint.
    pub e_raw: f64,
    pub e_final: f64,
    pub cap_details: CapDetails,
    pub calc_trace: CalcTrace,
    pub cascade_applied: bool,
    pub constrained_by: ConstrainedBy,
    pub attested_controls: usize,
    pub total_controls: usize,
}

impl DerivedDimeScore {
    pub fn final_score(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Design => self.d_score,
            Dimension::Implementation => self.i_score,
            Dimension::Monitoring => self.m_score,
            Dimension::Evaluation => self.e_final,
        }
    }

    pub fn has_attestation(&self) -> bool {
        self.attested_controls > 0
    }
}

/// Aggregate effectiveness; `NotComputed` until something has been attested.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Effectiveness {
    NotComputed,
    Computed {
        percent: f64,
        label: EffectivenessLabel,
    },
}

impl Effectiveness {
    pub fn percent(&self) -> Option<f64> {
        match self {
            Self::NotComputed => None,
            Self::Computed { percent, .. } => Some(*percent),
        }
    }

    pub fn label(&self) -> Option<EffectivenessLabel> {
        match self {
            Self::NotComputed => None,
            Self::Computed { label, .. } => Some(*label),
        }
    }
}
