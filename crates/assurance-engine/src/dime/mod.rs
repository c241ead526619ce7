//! DIME scoring pipeline.
//!
//! ```text
//! attested controls ─► aggregator (raw 0-3 per dimension + trace)
//!                   ─► resolver (hard caps ─► Design cascade ─► constrained E)
//!                   ─► normalizer (0-100 % + band)
//! ```

pub mod aggregator;
pub mod caps;
pub mod normalizer;

use std::time::Instant;

use assurance_core::errors::DomainError;
use assurance_core::models::{AttestedControl, DerivedDimeScore};

pub use aggregator::{join_controls, DimensionAggregator};
pub use caps::CapCascadeResolver;
pub use normalizer::{dimension_label, normalize, percent_of, round_one_decimal};

/// Run aggregation and cap/cascade resolution over one PCI instance's controls.
pub fn compute_dime(controls: &[AttestedControl]) -> Result<DerivedDimeScore, DomainError> {
    let started = Instant::now();
    let trace = DimensionAggregator::aggregate(controls)?;
    let score = CapCascadeResolver::resolve(trace, controls);
    tracing::debug!(
        dime_compute_time_us = started.elapsed().as_micros() as u64,
        d = score.d_score,
        i = score.i_score,
        m = score.m_score,
        e = score.e_final,
        cascade = score.cascade_applied,
        "computed DIME score"
    );
    Ok(score)
}
