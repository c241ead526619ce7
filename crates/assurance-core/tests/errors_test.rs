//! Tests for the error families and their codes.

use assurance_core::errors::error_code;
use assurance_core::errors::*;

#[test]
fn family_errors_convert_into_assurance_error() {
    let err: AssuranceError = ValidationError::MissingDueDate.into();
    assert!(matches!(err, AssuranceError::Validation(_)));

    let err: AssuranceError = NotFoundError::PciInstance("pci-1".into()).into();
    assert!(matches!(err, AssuranceError::NotFound(_)));

    let err: AssuranceError = PersistenceError::LockPoisoned.into();
    assert!(matches!(err, AssuranceError::Persistence(_)));
}

#[test]
fn codes_follow_the_family() {
    let cases: Vec<(AssuranceError, &str)> = vec![
        (ValidationError::MissingReviewNotes.into(), error_code::VALIDATION_ERROR),
        (
            DomainError::InvalidAttestation("dup".into()).into(),
            error_code::DOMAIN_ERROR,
        ),
        (NotFoundError::Template("t".into()).into(), error_code::NOT_FOUND),
        (
            PersistenceError::SqliteError {
                message: "disk I/O error".into(),
            }
            .into(),
            error_code::PERSISTENCE_ERROR,
        ),
        (
            PersistenceError::MigrationFailed {
                version: 2,
                message: "table exists".into(),
            }
            .into(),
            error_code::MIGRATION_FAILED,
        ),
        (
            ConflictError::VersionMismatch {
                entity: "control instance",
                id: "c1".into(),
                expected: 1,
                actual: 2,
            }
            .into(),
            error_code::CONFLICT,
        ),
        (
            ConfigError::FileNotFound {
                path: "assurance.toml".into(),
            }
            .into(),
            error_code::CONFIG_ERROR,
        ),
    ];
    for (err, code) in cases {
        assert_eq!(err.error_code(), code, "{err}");
    }
}

#[test]
fn coded_message_prefixes_code() {
    let err = ValidationError::InvalidTransition {
        entity: "evidence request",
        action: "submit",
        state: "accepted".into(),
    };
    assert_eq!(
        err.coded_message(),
        "[VALIDATION_ERROR] Cannot submit evidence request in state 'accepted'"
    );
}

#[test]
fn messages_name_the_offending_record() {
    let err = ValidationError::AttestationIncomplete {
        pci_instance_id: "pci-7".into(),
        attested: 3,
        total: 5,
    };
    assert_eq!(
        err.to_string(),
        "Attestation incomplete for pci-7: 3 of 5 controls attested"
    );

    let err = DomainError::UnknownEnumValue {
        kind: "attestation status",
        value: "maybe".into(),
    };
    assert_eq!(err.to_string(), "Unknown attestation status value: 'maybe'");
}
