use assurance_core::models::*;
use assurance_engine::dime::percent_of;
use assurance_engine::{compute_dime, EvidenceAction, EvidenceWorkflow};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

fn arb_dimension() -> impl Strategy<Value = Dimension> {
    prop_oneof![
        Just(Dimension::Design),
        Just(Dimension::Implementation),
        Just(Dimension::Monitoring),
        Just(Dimension::Evaluation),
    ]
}

fn arb_criticality() -> impl Strategy<Value = Criticality> {
    prop_oneof![
        Just(Criticality::Critical),
        Just(Criticality::Important),
        Just(Criticality::Optional),
    ]
}

fn arb_status() -> impl Strategy<Value = AttestationStatus> {
    prop_oneof![
        Just(AttestationStatus::Yes),
        Just(AttestationStatus::Partial),
        Just(AttestationStatus::No),
        Just(AttestationStatus::Na),
        Just(AttestationStatus::NotAttested),
    ]
}

fn arb_evidence_status() -> impl Strategy<Value = EvidenceStatus> {
    prop_oneof![
        Just(EvidenceStatus::Open),
        Just(EvidenceStatus::Submitted),
        Just(EvidenceStatus::Rejected),
        Just(EvidenceStatus::Accepted),
        Just(EvidenceStatus::Cancelled),
        Just(EvidenceStatus::Closed),
    ]
}

fn arb_controls() -> impl Strategy<Value = Vec<AttestedControl>> {
    prop::collection::vec((arb_dimension(), arb_criticality(), arb_status()), 0..24).prop_map(
        |rows| {
            rows.into_iter()
                .enumerate()
                .map(|(idx, (dimension, criticality, status))| {
                    AttestedControl::new(format!("C{idx}"), dimension, criticality, status)
                })
                .collect()
        },
    )
}

fn arb_score() -> impl Strategy<Value = f64> {
    0.0f64..=3.0
}

// ── Raw score bounds and formula ─────────────────────────────────────────

proptest! {
    #[test]
    fn raw_score_is_weighted_average(controls in arb_controls()) {
        let score = compute_dime(&controls).unwrap();
        for dimension in Dimension::all() {
            let trace = score.calc_trace.get(*dimension);
            prop_assert!((0.0..=3.0).contains(&trace.raw_score));
            if trace.weight_total > 0 {
                let expected = 3.0 * trace.weighted_sum / f64::from(trace.weight_total);
                prop_assert!((trace.raw_score - expected).abs() < 1e-9);
            } else {
                prop_assert_eq!(trace.raw_score, 0.0);
                prop_assert!(trace.no_applicable_controls);
            }
        }
    }
}

// ── Hard cap ─────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn critical_no_caps_dimension(controls in arb_controls()) {
        let score = compute_dime(&controls).unwrap();
        for dimension in Dimension::all() {
            let failed = controls.iter().any(|c| {
                c.dimension == *dimension
                    && c.criticality == Criticality::Critical
                    && c.status == AttestationStatus::No
            });
            prop_assert_eq!(score.cap_details.get(*dimension).capped, failed);
            if failed {
                prop_assert!(score.final_score(*dimension) <= 1.0);
            }
        }
    }
}

// ── Design cascade ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn failed_design_zeroes_dependents(
        design in prop::collection::vec(
            (arb_criticality(), prop_oneof![Just(AttestationStatus::No), Just(AttestationStatus::Na)]),
            1..6,
        ),
        rest in arb_controls(),
    ) {
        let mut controls: Vec<AttestedControl> = design
            .into_iter()
            .enumerate()
            .map(|(idx, (criticality, status))| {
                AttestedControl::new(format!("D{idx}"), Dimension::Design, criticality, status)
            })
            .collect();
        controls.extend(rest.into_iter().filter(|c| c.dimension != Dimension::Design));

        let score = compute_dime(&controls).unwrap();
        prop_assert!(score.cascade_applied);
        prop_assert_eq!(score.i_score, 0.0);
        prop_assert_eq!(score.m_score, 0.0);
        prop_assert_eq!(score.e_final, 0.0);
    }
}

// ── Evaluation constraint ────────────────────────────────────────────────

proptest! {
    #[test]
    fn evaluation_never_exceeds_other_dimensions(controls in arb_controls()) {
        let score = compute_dime(&controls).unwrap();
        let floor = score.d_score.min(score.i_score).min(score.m_score);
        prop_assert!(score.e_final <= floor);
        prop_assert!(score.e_final <= score.e_raw);
        match score.constrained_by {
            ConstrainedBy::None => prop_assert_eq!(score.e_final, score.e_raw),
            ConstrainedBy::Design => prop_assert_eq!(score.d_score, score.e_final),
            ConstrainedBy::Implementation => prop_assert_eq!(score.i_score, score.e_final),
            ConstrainedBy::Monitoring => prop_assert_eq!(score.m_score, score.e_final),
        }
    }
}

// ── Normalizer ───────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn effectiveness_is_bounded_and_monotonic(
        d in arb_score(),
        i in arb_score(),
        m in arb_score(),
        e in arb_score(),
        bump in 0.0f64..=1.0,
    ) {
        let base = percent_of(d, i, m, e);
        prop_assert!((0.0..=100.0).contains(&base));
        prop_assert!(percent_of((d + bump).min(3.0), i, m, e) >= base);
        prop_assert!(percent_of(d, (i + bump).min(3.0), m, e) >= base);
        prop_assert!(percent_of(d, i, (m + bump).min(3.0), e) >= base);
        prop_assert!(percent_of(d, i, m, (e + bump).min(3.0)) >= base);
    }
}

// ── Evidence ─────────────────────────────────────────────────────────────

fn request(status: EvidenceStatus, due_date: NaiveDate) -> EvidenceRequest {
    let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    EvidenceRequest {
        id: "req".into(),
        target: EvidenceTarget::Risk("risk".into()),
        risk_id: "risk".into(),
        pci_instance_id: None,
        status,
        due_date,
        is_critical_scope: false,
        notes: None,
        created_at: at,
        updated_at: at,
    }
}

proptest! {
    #[test]
    fn overdue_iff_past_due_and_awaiting(status in arb_evidence_status(), offset in -30i64..30) {
        let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let req = request(status, today + Duration::days(offset));
        let awaiting = matches!(status, EvidenceStatus::Open | EvidenceStatus::Rejected);
        prop_assert_eq!(req.is_overdue(today), offset < 0 && awaiting);
    }

    #[test]
    fn submit_only_from_open_or_rejected(status in arb_evidence_status()) {
        let action = EvidenceAction::Submit { note: "n".into() };
        let allowed = EvidenceWorkflow::can_transition(status, &action).is_some();
        prop_assert_eq!(
            allowed,
            matches!(status, EvidenceStatus::Open | EvidenceStatus::Rejected)
        );
    }
}
