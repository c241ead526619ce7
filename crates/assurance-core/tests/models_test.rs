//! Tests for the closed vocabulary and the model helpers.

use assurance_core::errors::DomainError;
use assurance_core::models::*;
use proptest::prelude::*;

#[test]
fn wire_strings_parse_back() {
    for status in AttestationStatus::all() {
        assert_eq!(status.as_str().parse::<AttestationStatus>().unwrap(), *status);
    }
    assert_eq!("D".parse::<Dimension>().unwrap(), Dimension::Design);
    assert_eq!("E".parse::<Dimension>().unwrap(), Dimension::Evaluation);
    assert_eq!(
        "transfer_share".parse::<ResponseType>().unwrap(),
        ResponseType::TransferShare
    );
}

#[test]
fn unknown_values_are_domain_errors() {
    let err = "Yes".parse::<AttestationStatus>().unwrap_err();
    assert_eq!(
        err,
        DomainError::UnknownEnumValue {
            kind: "attestation status",
            value: "Yes".into(),
        }
    );
    assert!("design".parse::<Dimension>().is_err());
    assert!("mitigate".parse::<ResponseType>().is_err());
}

proptest! {
    #[test]
    fn arbitrary_strings_never_parse_to_a_foreign_status(s in "[a-z_]{0,14}") {
        match s.parse::<EvidenceStatus>() {
            Ok(status) => prop_assert_eq!(status.as_str(), s.as_str()),
            Err(DomainError::UnknownEnumValue { kind, value }) => {
                prop_assert_eq!(kind, "evidence status");
                prop_assert_eq!(value, s);
            }
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }
}

#[test]
fn serde_uses_wire_strings() {
    assert_eq!(serde_json::to_string(&Dimension::Monitoring).unwrap(), "\"M\"");
    assert_eq!(
        serde_json::to_string(&AttestationStatus::NotAttested).unwrap(),
        "\"not_attested\""
    );
    assert_eq!(
        serde_json::to_string(&ResponseType::ReduceLikelihood).unwrap(),
        "\"reduce_likelihood\""
    );
    assert_eq!(serde_json::to_string(&ConstrainedBy::None).unwrap(), "\"none\"");
}

#[test]
fn weights_and_values() {
    assert_eq!(Criticality::Critical.weight(), 3);
    assert_eq!(Criticality::Important.weight(), 2);
    assert_eq!(Criticality::Optional.weight(), 1);

    assert_eq!(AttestationStatus::Yes.value(), Some(1.0));
    assert_eq!(AttestationStatus::Partial.value(), Some(0.5));
    assert_eq!(AttestationStatus::No.value(), Some(0.0));
    assert_eq!(AttestationStatus::Na.value(), None);
    assert_eq!(AttestationStatus::NotAttested.value(), None);

    assert!(AttestationStatus::Na.is_attested());
    assert!(!AttestationStatus::NotAttested.is_attested());
    assert!(AttestationStatus::Partial.claims_operation());
    assert!(!AttestationStatus::No.claims_operation());
}

#[test]
fn effectiveness_bands_have_inclusive_lower_bounds() {
    assert_eq!(EffectivenessLabel::for_percent(100.0), EffectivenessLabel::Strong);
    assert_eq!(EffectivenessLabel::for_percent(75.0), EffectivenessLabel::Strong);
    assert_eq!(EffectivenessLabel::for_percent(74.9), EffectivenessLabel::Moderate);
    assert_eq!(EffectivenessLabel::for_percent(50.0), EffectivenessLabel::Moderate);
    assert_eq!(EffectivenessLabel::for_percent(25.0), EffectivenessLabel::Weak);
    assert_eq!(EffectivenessLabel::for_percent(24.9), EffectivenessLabel::Critical);
    assert_eq!(EffectivenessLabel::for_dimension_score(1.5), EffectivenessLabel::Moderate);
    assert_eq!(EffectivenessLabel::Critical.color(), "red");
}

#[test]
fn effectiveness_serializes_with_state_tag() {
    let json = serde_json::to_value(Effectiveness::NotComputed).unwrap();
    assert_eq!(json, serde_json::json!({ "state": "not_computed" }));

    let computed = Effectiveness::Computed {
        percent: 66.7,
        label: EffectivenessLabel::Moderate,
    };
    assert_eq!(computed.percent(), Some(66.7));
    assert_eq!(
        serde_json::to_value(computed).unwrap(),
        serde_json::json!({ "state": "computed", "percent": 66.7, "label": "moderate" })
    );
}

#[test]
fn evidence_target_serializes_kind_and_id() {
    let target = EvidenceTarget::SecondaryControl("ctl-1".into());
    assert_eq!(target.kind(), "secondary_control");
    assert_eq!(target.id(), "ctl-1");
    assert_eq!(
        serde_json::to_value(&target).unwrap(),
        serde_json::json!({ "kind": "secondary_control", "id": "ctl-1" })
    );
}

#[test]
fn evidence_status_groups() {
    assert!(EvidenceStatus::Open.awaits_submission());
    assert!(EvidenceStatus::Rejected.awaits_submission());
    assert!(!EvidenceStatus::Submitted.awaits_submission());
    assert!(EvidenceStatus::Closed.is_terminal());
    assert!(EvidenceStatus::Cancelled.is_terminal());
    assert!(!EvidenceStatus::Accepted.is_terminal());
}

#[test]
fn attestation_summary_completeness() {
    let summary = |attested, total| PciAttestationSummary {
        pci_instance_id: "pci".into(),
        status: PciStatus::Draft,
        total_controls: total,
        attested_controls: attested,
    };
    assert!(summary(4, 4).is_complete());
    assert!(!summary(3, 4).is_complete());
    assert!(!summary(0, 0).is_complete());
    assert_eq!(summary(1, 4).completeness(), 0.25);
    assert_eq!(summary(0, 0).completeness(), 0.0);
}

#[test]
fn only_accept_skips_controls() {
    for response in ResponseType::all() {
        assert_eq!(response.requires_controls(), *response != ResponseType::Accept);
    }
}
