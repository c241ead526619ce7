//! risk_responses queries.

use assurance_core::errors::{AssuranceResult, PersistenceError};
use assurance_core::models::{AiProposedResponse, RiskResponse};
use rusqlite::{params, Connection, OptionalExtension};

use super::{format_timestamp, parse_enum, parse_timestamp, sqlite_error};

const TABLE: &str = "risk_responses";

struct ResponseRow {
    risk_id: String,
    response_type: String,
    rationale: Option<String>,
    ai_proposed: Option<String>,
    updated_at: String,
}

impl ResponseRow {
    fn into_model(self) -> AssuranceResult<RiskResponse> {
        let ai_proposed = match self.ai_proposed.as_deref() {
            Some(json) => Some(serde_json::from_str::<AiProposedResponse>(json).map_err(|e| {
                PersistenceError::CorruptRow {
                    table: TABLE,
                    message: format!("bad ai_proposed JSON: {e}"),
                }
            })?),
            None => None,
        };
        Ok(RiskResponse {
            risk_id: self.risk_id,
            response_type: parse_enum(&self.response_type)?,
            rationale: self.rationale,
            ai_proposed,
            updated_at: parse_timestamp(TABLE, &self.updated_at)?,
        })
    }
}

pub fn get_risk_response(conn: &Connection, risk_id: &str) -> AssuranceResult<Option<RiskResponse>> {
    let row = conn
        .query_row(
            "SELECT risk_id, response_type, rationale, ai_proposed, updated_at
             FROM risk_responses WHERE risk_id = ?1",
            params![risk_id],
            |row| {
                Ok(ResponseRow {
                    risk_id: row.get(0)?,
                    response_type: row.get(1)?,
                    rationale: row.get(2)?,
                    ai_proposed: row.get(3)?,
                    updated_at: row.get(4)?,
                })
            },
        )
        .optional()
        .map_err(sqlite_error)?;
    row.map(ResponseRow::into_model).transpose()
}

/// Insert or replace the single response of a risk.
pub fn upsert_risk_response(conn: &Connection, response: &RiskResponse) -> AssuranceResult<()> {
    let ai_proposed = response
        .ai_proposed
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| PersistenceError::SqliteError {
            message: format!("failed to encode ai_proposed: {e}"),
        })?;

    conn.execute(
        "INSERT INTO risk_responses (risk_id, response_type, rationale, ai_proposed, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(risk_id) DO UPDATE SET
            response_type = excluded.response_type,
            rationale = excluded.rationale,
            ai_proposed = excluded.ai_proposed,
            updated_at = excluded.updated_at",
        params![
            response.risk_id,
            response.response_type.as_str(),
            response.rationale,
            ai_proposed,
            format_timestamp(&response.updated_at),
        ],
    )
    .map_err(sqlite_error)?;
    Ok(())
}
