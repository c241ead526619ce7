//! Dimension Aggregator: weighted 0-3 raw score per dimension.
//!
//! ```text
//! raw_X = 3 × Σ(weight × value) / Σ weight      over attested, applicable controls
//! ```
//!
//! `na` and `not_attested` controls contribute neither weight nor value and
//! are recorded in the trace with their exclusion reason.

use rustc_hash::{FxHashMap, FxHashSet};

use assurance_core::constants::DIMENSION_MAX;
use assurance_core::errors::DomainError;
use assurance_core::models::{
    AttestationStatus, AttestedControl, CalcTrace, ControlTrace, Dimension, DimensionTrace,
    ExclusionReason, SecondaryControlInstance, SecondaryControlTemplate,
};

/// Join a PCI instance's controls to their catalog templates.
///
/// Fails when a control references an unknown template or when two
/// controls share a template.
pub fn join_controls(
    instances: &[SecondaryControlInstance],
    templates: &[SecondaryControlTemplate],
) -> Result<Vec<AttestedControl>, DomainError> {
    let by_id: FxHashMap<&str, &SecondaryControlTemplate> =
        templates.iter().map(|t| (t.id.as_str(), t)).collect();
    let mut seen_templates = FxHashSet::default();

    instances
        .iter()
        .map(|instance| {
            let template = by_id.get(instance.template_id.as_str()).ok_or_else(|| {
                DomainError::InvalidAttestation(format!(
                    "control {} references unknown template {}",
                    instance.id, instance.template_id
                ))
            })?;
            if !seen_templates.insert(instance.template_id.as_str()) {
                return Err(DomainError::InvalidAttestation(format!(
                    "template {} attested twice in PCI instance {}",
                    template.code, instance.pci_instance_id
                )));
            }
            Ok(AttestedControl {
                instance_id: instance.id.clone(),
                code: template.code.clone(),
                dimension: template.dimension,
                criticality: template.criticality,
                status: instance.status,
                evidence_exists: instance.evidence_exists,
            })
        })
        .collect()
}

/// Computes raw dimension scores and the per-control trace.
pub struct DimensionAggregator;

impl DimensionAggregator {
    /// Aggregate all four dimensions.
    pub fn aggregate(controls: &[AttestedControl]) -> Result<CalcTrace, DomainError> {
        let mut seen = FxHashSet::default();
        for control in controls {
            if !seen.insert(control.instance_id.as_str()) {
                return Err(DomainError::InvalidAttestation(format!(
                    "control instance {} appears more than once",
                    control.instance_id
                )));
            }
        }

        Ok(CalcTrace {
            design: Self::aggregate_dimension(Dimension::Design, controls),
            implementation: Self::aggregate_dimension(Dimension::Implementation, controls),
            monitoring: Self::aggregate_dimension(Dimension::Monitoring, controls),
            evaluation: Self::aggregate_dimension(Dimension::Evaluation, controls),
        })
    }

    /// Aggregate one dimension, ignoring controls of other dimensions.
    pub fn aggregate_dimension(dimension: Dimension, controls: &[AttestedControl]) -> DimensionTrace {
        let mut trace = DimensionTrace::empty(dimension);

        for control in controls.iter().filter(|c| c.dimension == dimension) {
            let weight = control.criticality.weight();
            let line = match control.status.value() {
                Some(value) => {
                    let contribution = f64::from(weight) * value;
                    trace.weighted_sum += contribution;
                    trace.weight_total += weight;
                    ControlTrace {
                        code: control.code.clone(),
                        criticality: control.criticality,
                        status: control.status,
                        weight,
                        value: Some(value),
                        contribution,
                        excluded: None,
                    }
                }
                None => ControlTrace {
                    code: control.code.clone(),
                    criticality: control.criticality,
                    status: control.status,
                    weight,
                    value: None,
                    contribution: 0.0,
                    excluded: Some(exclusion_reason(control.status)),
                },
            };
            trace.controls.push(line);
        }

        if trace.weight_total > 0 {
            trace.raw_score = (DIMENSION_MAX * trace.weighted_sum / f64::from(trace.weight_total))
                .clamp(0.0, DIMENSION_MAX);
            trace.no_applicable_controls = false;
        }

        trace
    }
}

fn exclusion_reason(status: AttestationStatus) -> ExclusionReason {
    match status {
        AttestationStatus::Na => ExclusionReason::NotApplicable,
        _ => ExclusionReason::NotAttested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assurance_core::models::Criticality;

    fn control(code: &str, criticality: Criticality, status: AttestationStatus) -> AttestedControl {
        AttestedControl::new(code, Dimension::Design, criticality, status)
    }

    #[test]
    fn mixed_weights_produce_weighted_average() {
        let controls = vec![
            control("D1", Criticality::Critical, AttestationStatus::Yes),
            control("D2", Criticality::Important, AttestationStatus::Partial),
            control("D3", Criticality::Optional, AttestationStatus::No),
        ];
        let trace = DimensionAggregator::aggregate_dimension(Dimension::Design, &controls);
        // (3*1 + 2*0.5 + 1*0) / 6 = 4/6
        assert_eq!(trace.weight_total, 6);
        assert!((trace.weighted_sum - 4.0).abs() < 1e-12);
        assert!((trace.raw_score - 2.0).abs() < 1e-12);
    }

    #[test]
    fn excluded_controls_keep_their_reason() {
        let controls = vec![
            control("D1", Criticality::Critical, AttestationStatus::Na),
            control("D2", Criticality::Critical, AttestationStatus::NotAttested),
        ];
        let trace = DimensionAggregator::aggregate_dimension(Dimension::Design, &controls);
        assert_eq!(trace.raw_score, 0.0);
        assert!(trace.no_applicable_controls);
        assert_eq!(trace.controls[0].excluded, Some(ExclusionReason::NotApplicable));
        assert_eq!(trace.controls[1].excluded, Some(ExclusionReason::NotAttested));
        assert_eq!(trace.controls[1].contribution, 0.0);
    }

    #[test]
    fn duplicate_instance_is_rejected() {
        let controls = vec![
            control("D1", Criticality::Critical, AttestationStatus::Yes),
            control("D1", Criticality::Critical, AttestationStatus::No),
        ];
        let err = DimensionAggregator::aggregate(&controls).unwrap_err();
        assert!(matches!(err, DomainError::InvalidAttestation(_)));
    }
}
