//! Cap & Cascade Resolver.
//!
//! Order matters and is fixed:
//! 1. hard caps per dimension (critical control answered `no` ⇒ ≤ 1.0)
//! 2. Design-zero cascade (I, M, E forced to 0)
//! 3. Evaluation constrained by min(D, I, M)

use assurance_core::constants::HARD_CAP_CEILING;
use assurance_core::models::{
    AttestationStatus, AttestedControl, CalcTrace, CapDetails, ConstrainedBy, Criticality,
    DerivedDimeScore, Dimension, DimensionCap,
};

/// Turns a raw calculation trace into the final DIME score.
pub struct CapCascadeResolver;

impl CapCascadeResolver {
    pub fn resolve(trace: CalcTrace, controls: &[AttestedControl]) -> DerivedDimeScore {
        let mut cap_details = CapDetails::default();
        let mut finals = [0.0_f64; 4];

        for (slot, dimension) in Dimension::all().iter().enumerate() {
            let cap = Self::hard_cap(*dimension, controls);
            let raw = trace.raw_score(*dimension);
            finals[slot] = if cap.capped { raw.min(HARD_CAP_CEILING) } else { raw };
            *cap_details.get_mut(*dimension) = cap;
        }

        let [d_score, mut i_score, mut m_score, e_raw] = finals;
        let cascade_applied = Self::design_cascade_applies(controls);
        if cascade_applied {
            // e_raw keeps the capped aggregate; only the finals collapse.
            i_score = 0.0;
            m_score = 0.0;
        }
        let (e_final, constrained_by) = Self::constrain_evaluation(e_raw, d_score, i_score, m_score);

        let total_controls = controls.len();
        let attested_controls = controls.iter().filter(|c| c.status.is_attested()).count();

        DerivedDimeScore {
            d_score,
            i_score,
            m_score,
            e_raw,
            e_final,
            cap_details,
            calc_trace: trace,
            cascade_applied,
            constrained_by,
            attested_controls,
            total_controls,
        }
    }

    /// Cap state of one dimension: capped iff any critical control in it is `no`.
    pub fn hard_cap(dimension: Dimension, controls: &[AttestedControl]) -> DimensionCap {
        let caps_triggered: smallvec::SmallVec<[String; 2]> = controls
            .iter()
            .filter(|c| {
                c.dimension == dimension
                    && c.criticality == Criticality::Critical
                    && c.status == AttestationStatus::No
            })
            .map(|c| c.code.clone())
            .collect();
        DimensionCap {
            capped: !caps_triggered.is_empty(),
            caps_triggered,
        }
    }

    /// True iff there is at least one Design control, every Design control is
    /// attested, and none of them contributes anything (`no` or `na`).
    pub fn design_cascade_applies(controls: &[AttestedControl]) -> bool {
        let mut design = controls
            .iter()
            .filter(|c| c.dimension == Dimension::Design)
            .peekable();
        if design.peek().is_none() {
            return false;
        }
        design.all(|c| matches!(c.status, AttestationStatus::No | AttestationStatus::Na))
    }

    /// `e_final = min(e_raw, d, i, m)`. The constraining dimension is the first
    /// of D, I, M holding the minimum; `None` when E was already the minimum.
    pub fn constrain_evaluation(e_raw: f64, d: f64, i: f64, m: f64) -> (f64, ConstrainedBy) {
        let others = [
            (d, ConstrainedBy::Design),
            (i, ConstrainedBy::Implementation),
            (m, ConstrainedBy::Monitoring),
        ];
        let floor = d.min(i).min(m);
        if e_raw <= floor {
            return (e_raw, ConstrainedBy::None);
        }
        let by = others
            .iter()
            .find(|(score, _)| *score == floor)
            .map(|(_, by)| *by)
            .unwrap_or(ConstrainedBy::None);
        (floor, by)
    }
}
