//! control_instances queries.

use assurance_core::errors::{AssuranceResult, ConflictError, NotFoundError};
use assurance_core::models::SecondaryControlInstance;
use assurance_core::traits::AttestationWrite;
use rusqlite::{params, Connection, OptionalExtension};

use super::{
    format_timestamp, parse_enum, parse_optional_timestamp, sqlite_error, to_version,
};

const TABLE: &str = "control_instances";

struct ControlRow {
    id: String,
    pci_instance_id: String,
    template_id: String,
    status: String,
    evidence_exists: bool,
    notes: Option<String>,
    na_rationale: Option<String>,
    attested_at: Option<String>,
    version: i64,
}

impl ControlRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            pci_instance_id: row.get(1)?,
            template_id: row.get(2)?,
            status: row.get(3)?,
            evidence_exists: row.get(4)?,
            notes: row.get(5)?,
            na_rationale: row.get(6)?,
            attested_at: row.get(7)?,
            version: row.get(8)?,
        })
    }

    fn into_model(self) -> AssuranceResult<SecondaryControlInstance> {
        Ok(SecondaryControlInstance {
            id: self.id,
            pci_instance_id: self.pci_instance_id,
            template_id: self.template_id,
            status: parse_enum(&self.status)?,
            evidence_exists: self.evidence_exists,
            notes: self.notes,
            na_rationale: self.na_rationale,
            attested_at: parse_optional_timestamp(TABLE, self.attested_at.as_deref())?,
            version: to_version(TABLE, self.version)?,
        })
    }
}

const SELECT_COLUMNS: &str = "SELECT id, pci_instance_id, template_id, status, evidence_exists,
        notes, na_rationale, attested_at, version
     FROM control_instances";

pub fn insert_control(conn: &Connection, control: &SecondaryControlInstance) -> AssuranceResult<()> {
    conn.execute(
        "INSERT INTO control_instances
            (id, pci_instance_id, template_id, status, evidence_exists, notes, na_rationale, attested_at, version)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            control.id,
            control.pci_instance_id,
            control.template_id,
            control.status.as_str(),
            control.evidence_exists,
            control.notes,
            control.na_rationale,
            control.attested_at.as_ref().map(format_timestamp),
            control.version as i64,
        ],
    )
    .map_err(sqlite_error)?;
    Ok(())
}

pub fn get_control(conn: &Connection, id: &str) -> AssuranceResult<Option<SecondaryControlInstance>> {
    let row = conn
        .prepare_cached(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
        .map_err(sqlite_error)?
        .query_row(params![id], ControlRow::from_row)
        .optional()
        .map_err(sqlite_error)?;
    row.map(ControlRow::into_model).transpose()
}

/// Controls of one PCI instance in creation order.
pub fn list_controls(conn: &Connection, pci_instance_id: &str) -> AssuranceResult<Vec<SecondaryControlInstance>> {
    let mut stmt = conn
        .prepare_cached(&format!("{SELECT_COLUMNS} WHERE pci_instance_id = ?1 ORDER BY rowid"))
        .map_err(sqlite_error)?;
    let rows = stmt
        .query_map(params![pci_instance_id], ControlRow::from_row)
        .map_err(sqlite_error)?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(sqlite_error)?.into_model()?);
    }
    Ok(result)
}

/// Apply one attestation write if the stored version still matches.
/// Bumps the version by one.
pub fn apply_attestation(conn: &Connection, write: &AttestationWrite) -> AssuranceResult<()> {
    let stored: Option<i64> = conn
        .query_row(
            "SELECT version FROM control_instances WHERE id = ?1",
            params![write.control_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(sqlite_error)?;
    let Some(stored) = stored else {
        return Err(NotFoundError::ControlInstance(write.control_id.clone()).into());
    };
    let stored = to_version(TABLE, stored)?;
    if stored != write.expected_version {
        return Err(ConflictError::VersionMismatch {
            entity: "control instance",
            id: write.control_id.clone(),
            expected: write.expected_version,
            actual: stored,
        }
        .into());
    }

    conn.execute(
        "UPDATE control_instances
         SET status = ?1, evidence_exists = ?2, notes = ?3, na_rationale = ?4,
             attested_at = ?5, version = version + 1
         WHERE id = ?6 AND version = ?7",
        params![
            write.status.as_str(),
            write.evidence_exists,
            write.notes,
            write.na_rationale,
            write.attested_at.as_ref().map(format_timestamp),
            write.control_id,
            stored as i64,
        ],
    )
    .map_err(sqlite_error)?;
    Ok(())
}
