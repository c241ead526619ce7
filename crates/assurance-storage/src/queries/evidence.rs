//! evidence_requests and evidence_submissions queries.

use assurance_core::errors::{AssuranceResult, ConflictError, DomainError, NotFoundError};
use assurance_core::models::{
    EvidenceCommit, EvidenceRequest, EvidenceStatus, EvidenceSubmission, EvidenceTarget,
    ReviewDecision, SubmissionWrite,
};
use rusqlite::{params, Connection, OptionalExtension};

use super::{
    format_date, format_timestamp, parse_date, parse_enum, parse_optional_timestamp,
    parse_timestamp, sqlite_error,
};

const REQUESTS: &str = "evidence_requests";
const SUBMISSIONS: &str = "evidence_submissions";

fn parse_target(kind: &str, id: String) -> Result<EvidenceTarget, DomainError> {
    match kind {
        "pci_instance" => Ok(EvidenceTarget::PciInstance(id)),
        "secondary_control" => Ok(EvidenceTarget::SecondaryControl(id)),
        "risk" => Ok(EvidenceTarget::Risk(id)),
        other => Err(DomainError::UnknownEnumValue {
            kind: "evidence target",
            value: other.to_string(),
        }),
    }
}

struct RequestRow {
    id: String,
    target_kind: String,
    target_id: String,
    risk_id: String,
    pci_instance_id: Option<String>,
    status: String,
    due_date: String,
    is_critical_scope: bool,
    notes: Option<String>,
    created_at: String,
    updated_at: String,
}

impl RequestRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            target_kind: row.get(1)?,
            target_id: row.get(2)?,
            risk_id: row.get(3)?,
            pci_instance_id: row.get(4)?,
            status: row.get(5)?,
            due_date: row.get(6)?,
            is_critical_scope: row.get(7)?,
            notes: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }

    fn into_model(self) -> AssuranceResult<EvidenceRequest> {
        Ok(EvidenceRequest {
            id: self.id,
            target: parse_target(&self.target_kind, self.target_id)?,
            risk_id: self.risk_id,
            pci_instance_id: self.pci_instance_id,
            status: parse_enum(&self.status)?,
            due_date: parse_date(REQUESTS, &self.due_date)?,
            is_critical_scope: self.is_critical_scope,
            notes: self.notes,
            created_at: parse_timestamp(REQUESTS, &self.created_at)?,
            updated_at: parse_timestamp(REQUESTS, &self.updated_at)?,
        })
    }
}

struct SubmissionRow {
    id: String,
    request_id: String,
    submission_note: String,
    decision: Option<String>,
    review_notes: Option<String>,
    submitted_at: String,
    reviewed_at: Option<String>,
}

impl SubmissionRow {
    fn into_model(self) -> AssuranceResult<EvidenceSubmission> {
        Ok(EvidenceSubmission {
            id: self.id,
            request_id: self.request_id,
            submission_note: self.submission_note,
            decision: self
                .decision
                .as_deref()
                .map(parse_enum::<ReviewDecision>)
                .transpose()?,
            review_notes: self.review_notes,
            submitted_at: parse_timestamp(SUBMISSIONS, &self.submitted_at)?,
            reviewed_at: parse_optional_timestamp(SUBMISSIONS, self.reviewed_at.as_deref())?,
        })
    }
}

const SELECT_REQUESTS: &str = "SELECT id, target_kind, target_id, risk_id, pci_instance_id, status,
        due_date, is_critical_scope, notes, created_at, updated_at
     FROM evidence_requests";

pub fn insert_request(conn: &Connection, request: &EvidenceRequest) -> AssuranceResult<()> {
    conn.execute(
        "INSERT INTO evidence_requests
            (id, target_kind, target_id, risk_id, pci_instance_id, status, due_date,
             is_critical_scope, notes, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            request.id,
            request.target.kind(),
            request.target.id(),
            request.risk_id,
            request.pci_instance_id,
            request.status.as_str(),
            format_date(&request.due_date),
            request.is_critical_scope,
            request.notes,
            format_timestamp(&request.created_at),
            format_timestamp(&request.updated_at),
        ],
    )
    .map_err(sqlite_error)?;
    Ok(())
}

pub fn get_request(conn: &Connection, id: &str) -> AssuranceResult<Option<EvidenceRequest>> {
    let row = conn
        .prepare_cached(&format!("{SELECT_REQUESTS} WHERE id = ?1"))
        .map_err(sqlite_error)?
        .query_row(params![id], RequestRow::from_row)
        .optional()
        .map_err(sqlite_error)?;
    row.map(RequestRow::into_model).transpose()
}

/// Every request resolved to a risk, oldest first.
pub fn list_requests_for_risk(conn: &Connection, risk_id: &str) -> AssuranceResult<Vec<EvidenceRequest>> {
    let mut stmt = conn
        .prepare_cached(&format!("{SELECT_REQUESTS} WHERE risk_id = ?1 ORDER BY created_at, rowid"))
        .map_err(sqlite_error)?;
    let rows = stmt
        .query_map(params![risk_id], RequestRow::from_row)
        .map_err(sqlite_error)?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(sqlite_error)?.into_model()?);
    }
    Ok(result)
}

/// Submissions of a request, oldest first; the last one is current.
pub fn list_submissions(conn: &Connection, request_id: &str) -> AssuranceResult<Vec<EvidenceSubmission>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, request_id, submission_note, decision, review_notes, submitted_at, reviewed_at
             FROM evidence_submissions
             WHERE request_id = ?1
             ORDER BY submitted_at, rowid",
        )
        .map_err(sqlite_error)?;
    let rows = stmt
        .query_map(params![request_id], |row| {
            Ok(SubmissionRow {
                id: row.get(0)?,
                request_id: row.get(1)?,
                submission_note: row.get(2)?,
                decision: row.get(3)?,
                review_notes: row.get(4)?,
                submitted_at: row.get(5)?,
                reviewed_at: row.get(6)?,
            })
        })
        .map_err(sqlite_error)?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(sqlite_error)?.into_model()?);
    }
    Ok(result)
}

/// Apply a planned transition: status compare-and-set plus the submission
/// insert or decision. Callers run this inside a transaction.
pub fn apply_commit(conn: &Connection, commit: &EvidenceCommit) -> AssuranceResult<()> {
    let current: Option<String> = conn
        .query_row(
            "SELECT status FROM evidence_requests WHERE id = ?1",
            params![commit.request_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(sqlite_error)?;
    let Some(current) = current else {
        return Err(NotFoundError::EvidenceRequest(commit.request_id.clone()).into());
    };
    let current: EvidenceStatus = parse_enum(&current)?;
    if current != commit.from {
        return Err(ConflictError::StateMismatch {
            entity: "evidence request",
            id: commit.request_id.clone(),
            expected: commit.from.to_string(),
            actual: current.to_string(),
        }
        .into());
    }

    conn.execute(
        "UPDATE evidence_requests SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![commit.to.as_str(), format_timestamp(&commit.at), commit.request_id],
    )
    .map_err(sqlite_error)?;

    match &commit.submission {
        Some(SubmissionWrite::Insert(submission)) => {
            conn.execute(
                "INSERT INTO evidence_submissions
                    (id, request_id, submission_note, decision, review_notes, submitted_at, reviewed_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    submission.id,
                    submission.request_id,
                    submission.submission_note,
                    submission.decision.map(|d| d.as_str()),
                    submission.review_notes,
                    format_timestamp(&submission.submitted_at),
                    submission.reviewed_at.as_ref().map(format_timestamp),
                ],
            )
            .map_err(sqlite_error)?;
        }
        Some(SubmissionWrite::Decide {
            submission_id,
            decision,
            review_notes,
            reviewed_at,
        }) => {
            let changed = conn
                .execute(
                    "UPDATE evidence_submissions
                     SET decision = ?1, review_notes = ?2, reviewed_at = ?3
                     WHERE id = ?4 AND request_id = ?5 AND decision IS NULL",
                    params![
                        decision.as_str(),
                        review_notes,
                        format_timestamp(reviewed_at),
                        submission_id,
                        commit.request_id,
                    ],
                )
                .map_err(sqlite_error)?;
            if changed == 0 {
                return Err(ConflictError::StateMismatch {
                    entity: "evidence submission",
                    id: submission_id.clone(),
                    expected: "pending review".to_string(),
                    actual: "decided or missing".to_string(),
                }
                .into());
            }
        }
        None => {}
    }
    Ok(())
}
