//! Effectiveness Normalizer: four final dimension scores → one percentage.
//!
//! ```text
//! effectiveness% = round(avg(D, I, M, E) / 3 × 100, 1)
//! ```

use assurance_core::constants::DIMENSION_MAX;
use assurance_core::models::{DerivedDimeScore, Dimension, Effectiveness, EffectivenessLabel};

/// Normalize a derived score. `NotComputed` until at least one control is attested.
pub fn normalize(score: &DerivedDimeScore) -> Effectiveness {
    if !score.has_attestation() {
        return Effectiveness::NotComputed;
    }
    let percent = percent_of(score.d_score, score.i_score, score.m_score, score.e_final);
    Effectiveness::Computed {
        percent,
        label: EffectivenessLabel::for_percent(percent),
    }
}

/// Percentage for four 0-3 dimension scores, rounded to one decimal.
pub fn percent_of(d: f64, i: f64, m: f64, e: f64) -> f64 {
    let average = (d + i + m + e) / 4.0;
    round_one_decimal(average / DIMENSION_MAX * 100.0)
}

/// Round half away from zero to one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Band of a single final dimension score.
pub fn dimension_label(score: &DerivedDimeScore, dimension: Dimension) -> EffectivenessLabel {
    EffectivenessLabel::for_dimension_score(score.final_score(dimension))
}
