//! Confidence scoring against the configurable point table.
//!
//! ```text
//! score = clamp(baseline + Σ driver points, 0, 100)
//! ```
//!
//! Repeated drivers scale per occurrence and are bounded by their floor
//! (negative) or cap (positive).

use std::cmp::Reverse;

use chrono::{DateTime, Utc};

use assurance_core::config::{ConfidenceConfig, ConfidenceWeights};
use assurance_core::models::{
    ConfidenceDriver, ConfidenceLabel, ConfidenceScore, DriverKind, DriverType,
};

use super::inputs::ConfidenceInputs;

/// Scores confidence for one PCI instance.
#[derive(Debug, Clone)]
pub struct ConfidenceScorer {
    weights: ConfidenceWeights,
    high_threshold: u32,
    medium_threshold: u32,
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self::new(&ConfidenceConfig::default())
    }
}

impl ConfidenceScorer {
    pub fn new(config: &ConfidenceConfig) -> Self {
        Self {
            weights: config.effective_weights(),
            high_threshold: config.effective_high_threshold(),
            medium_threshold: config.effective_medium_threshold(),
        }
    }

    pub fn score(&self, inputs: &ConfidenceInputs, computed_at: DateTime<Utc>) -> ConfidenceScore {
        let mut drivers = self.drivers(inputs);
        drivers.sort_by(|a, b| {
            Reverse(a.points.abs())
                .cmp(&Reverse(b.points.abs()))
                .then(a.kind.cmp(&b.kind))
                .then_with(|| a.text.cmp(&b.text))
        });

        let total: i32 = drivers.iter().map(|d| d.points).sum();
        let confidence_score = (self.weights.baseline + total).clamp(0, 100) as u32;

        tracing::debug!(
            confidence_score,
            drivers = drivers.len(),
            "computed confidence"
        );

        ConfidenceScore {
            confidence_score,
            confidence_label: self.label_for(confidence_score),
            drivers,
            computed_at,
        }
    }

    pub fn label_for(&self, score: u32) -> ConfidenceLabel {
        if score >= self.high_threshold {
            ConfidenceLabel::High
        } else if score >= self.medium_threshold {
            ConfidenceLabel::Medium
        } else {
            ConfidenceLabel::Low
        }
    }

    fn drivers(&self, inputs: &ConfidenceInputs) -> Vec<ConfidenceDriver> {
        let w = &self.weights;
        let mut drivers = Vec::with_capacity(8);

        if inputs.attestation_complete() {
            drivers.push(driver(
                DriverType::AttestationComplete,
                format!("All {} controls attested", inputs.total_controls),
                w.attestation_complete,
            ));
        } else {
            let missing = inputs.missing_controls();
            let fraction = if inputs.total_controls == 0 {
                1.0
            } else {
                missing as f64 / inputs.total_controls as f64
            };
            let points = ((f64::from(w.attestation_incomplete) * fraction).round() as i32).min(-1);
            let text = if inputs.total_controls == 0 {
                "No controls to attest".to_string()
            } else {
                format!("{missing} of {} controls not attested", inputs.total_controls)
            };
            drivers.push(driver(DriverType::AttestationIncomplete, text, points));
        }

        if inputs.critical_claimed > 0 {
            if inputs.critical_missing_evidence == 0 {
                drivers.push(driver(
                    DriverType::CriticalEvidencePresent,
                    format!("Evidence on all {} operating critical controls", inputs.critical_claimed),
                    w.critical_evidence_present,
                ));
            } else {
                drivers.push(driver(
                    DriverType::CriticalEvidenceMissing,
                    format!(
                        "{} critical control(s) without evidence",
                        inputs.critical_missing_evidence
                    ),
                    floored(inputs.critical_missing_evidence, w.critical_evidence_missing_each, w.critical_evidence_missing_floor),
                ));
            }
        }

        if inputs.overdue_requests > 0 {
            drivers.push(driver(
                DriverType::EvidenceOverdue,
                format!("{} evidence request(s) overdue", inputs.overdue_requests),
                floored(inputs.overdue_requests, w.evidence_overdue_each, w.evidence_overdue_floor),
            ));
        }
        if inputs.outstanding_requests > 0 {
            drivers.push(driver(
                DriverType::EvidenceOutstanding,
                format!("{} evidence request(s) awaiting submission", inputs.outstanding_requests),
                floored(
                    inputs.outstanding_requests,
                    w.evidence_outstanding_each,
                    w.evidence_outstanding_floor,
                ),
            ));
        }
        if inputs.pending_review > 0 {
            drivers.push(driver(
                DriverType::EvidencePendingReview,
                format!("{} submission(s) pending review", inputs.pending_review),
                0,
            ));
        }
        if inputs.accepted_requests > 0 {
            drivers.push(driver(
                DriverType::EvidenceAccepted,
                format!("{} evidence request(s) accepted", inputs.accepted_requests),
                capped(inputs.accepted_requests, w.evidence_accepted_each, w.evidence_accepted_cap),
            ));
        }
        if inputs.critical_scope_accepted > 0 {
            drivers.push(driver(
                DriverType::CriticalScopeAccepted,
                format!("{} critical-scope submission(s) accepted", inputs.critical_scope_accepted),
                capped(
                    inputs.critical_scope_accepted,
                    w.critical_scope_accepted_each,
                    w.critical_scope_accepted_cap,
                ),
            ));
        }
        if inputs.critical_scope_rejected > 0 {
            drivers.push(driver(
                DriverType::CriticalScopeRejected,
                format!("{} critical-scope submission(s) rejected", inputs.critical_scope_rejected),
                floored(
                    inputs.critical_scope_rejected,
                    w.critical_scope_rejected_each,
                    w.critical_scope_rejected_floor,
                ),
            ));
        }

        drivers
    }
}

fn driver(driver: DriverType, text: String, points: i32) -> ConfidenceDriver {
    let kind = match points {
        p if p > 0 => DriverKind::Positive,
        p if p < 0 => DriverKind::Negative,
        _ => DriverKind::Neutral,
    };
    ConfidenceDriver {
        kind,
        driver,
        text,
        points,
    }
}

fn floored(count: usize, each: i32, floor: i32) -> i32 {
    each.saturating_mul(count as i32).max(floor)
}

fn capped(count: usize, each: i32, cap: i32) -> i32 {
    each.saturating_mul(count as i32).min(cap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_drivers_are_bounded() {
        assert_eq!(floored(5, -10, -30), -30);
        assert_eq!(floored(2, -10, -30), -20);
        assert_eq!(capped(4, 5, 15), 15);
        assert_eq!(capped(1, 5, 15), 5);
    }

    #[test]
    fn driver_kind_follows_sign() {
        assert_eq!(driver(DriverType::EvidenceAccepted, String::new(), 5).kind, DriverKind::Positive);
        assert_eq!(driver(DriverType::EvidenceOverdue, String::new(), -5).kind, DriverKind::Negative);
        assert_eq!(driver(DriverType::EvidencePendingReview, String::new(), 0).kind, DriverKind::Neutral);
    }
}
