//! pci_instances queries.

use assurance_core::errors::{AssuranceResult, ConflictError, NotFoundError};
use assurance_core::models::{PciInstance, PciStatus};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{format_timestamp, parse_enum, parse_optional_timestamp, parse_timestamp, sqlite_error};

const TABLE: &str = "pci_instances";

struct PciRow {
    id: String,
    risk_id: String,
    name: String,
    objective: String,
    status: String,
    created_at: String,
    activated_at: Option<String>,
    retired_at: Option<String>,
}

impl PciRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            risk_id: row.get(1)?,
            name: row.get(2)?,
            objective: row.get(3)?,
            status: row.get(4)?,
            created_at: row.get(5)?,
            activated_at: row.get(6)?,
            retired_at: row.get(7)?,
        })
    }

    fn into_model(self) -> AssuranceResult<PciInstance> {
        Ok(PciInstance {
            id: self.id,
            risk_id: self.risk_id,
            name: self.name,
            objective: parse_enum(&self.objective)?,
            status: parse_enum(&self.status)?,
            created_at: parse_timestamp(TABLE, &self.created_at)?,
            activated_at: parse_optional_timestamp(TABLE, self.activated_at.as_deref())?,
            retired_at: parse_optional_timestamp(TABLE, self.retired_at.as_deref())?,
        })
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, risk_id, name, objective, status, created_at, activated_at, retired_at FROM pci_instances";

pub fn insert_pci_instance(conn: &Connection, instance: &PciInstance) -> AssuranceResult<()> {
    conn.execute(
        "INSERT INTO pci_instances (id, risk_id, name, objective, status, created_at, activated_at, retired_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            instance.id,
            instance.risk_id,
            instance.name,
            instance.objective.as_str(),
            instance.status.as_str(),
            format_timestamp(&instance.created_at),
            instance.activated_at.as_ref().map(format_timestamp),
            instance.retired_at.as_ref().map(format_timestamp),
        ],
    )
    .map_err(sqlite_error)?;
    Ok(())
}

pub fn get_pci_instance(conn: &Connection, id: &str) -> AssuranceResult<Option<PciInstance>> {
    let row = conn
        .prepare_cached(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
        .map_err(sqlite_error)?
        .query_row(params![id], PciRow::from_row)
        .optional()
        .map_err(sqlite_error)?;
    row.map(PciRow::into_model).transpose()
}

/// Instances protecting a risk, oldest first.
pub fn list_pci_instances(conn: &Connection, risk_id: &str) -> AssuranceResult<Vec<PciInstance>> {
    let mut stmt = conn
        .prepare_cached(&format!("{SELECT_COLUMNS} WHERE risk_id = ?1 ORDER BY created_at, rowid"))
        .map_err(sqlite_error)?;
    let rows = stmt
        .query_map(params![risk_id], PciRow::from_row)
        .map_err(sqlite_error)?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(sqlite_error)?.into_model()?);
    }
    Ok(result)
}

/// Compare-and-set the lifecycle status. Stamps `activated_at` or
/// `retired_at` according to the target state.
pub fn update_pci_status(
    conn: &Connection,
    id: &str,
    from: PciStatus,
    to: PciStatus,
    at: &DateTime<Utc>,
) -> AssuranceResult<()> {
    let current: Option<String> = conn
        .query_row(
            "SELECT status FROM pci_instances WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()
        .map_err(sqlite_error)?;
    let Some(current) = current else {
        return Err(NotFoundError::PciInstance(id.to_string()).into());
    };
    let current: PciStatus = parse_enum(&current)?;
    if current != from {
        return Err(ConflictError::StateMismatch {
            entity: "PCI instance",
            id: id.to_string(),
            expected: from.to_string(),
            actual: current.to_string(),
        }
        .into());
    }

    let stamp_column = match to {
        PciStatus::Active => Some("activated_at"),
        PciStatus::Retired => Some("retired_at"),
        PciStatus::Draft => None,
    };
    match stamp_column {
        Some(column) => conn.execute(
            &format!("UPDATE pci_instances SET status = ?1, {column} = ?2 WHERE id = ?3"),
            params![to.as_str(), format_timestamp(at), id],
        ),
        None => conn.execute(
            "UPDATE pci_instances SET status = ?1 WHERE id = ?2",
            params![to.as_str(), id],
        ),
    }
    .map_err(sqlite_error)?;
    Ok(())
}
