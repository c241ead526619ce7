//! V002: evidence requests and submissions.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS evidence_requests (
    id TEXT PRIMARY KEY,
    target_kind TEXT NOT NULL,
    target_id TEXT NOT NULL,
    risk_id TEXT NOT NULL,
    pci_instance_id TEXT REFERENCES pci_instances(id),
    status TEXT NOT NULL DEFAULT 'open',
    due_date TEXT NOT NULL,
    is_critical_scope INTEGER NOT NULL DEFAULT 0,
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_evidence_requests_risk ON evidence_requests(risk_id);
CREATE INDEX IF NOT EXISTS idx_evidence_requests_pci ON evidence_requests(pci_instance_id);

-- Submissions in arrival order; the latest one is current.
CREATE TABLE IF NOT EXISTS evidence_submissions (
    id TEXT PRIMARY KEY,
    request_id TEXT NOT NULL REFERENCES evidence_requests(id),
    submission_note TEXT NOT NULL,
    decision TEXT,
    review_notes TEXT,
    submitted_at TEXT NOT NULL,
    reviewed_at TEXT
) STRICT;

CREATE INDEX IF NOT EXISTS idx_evidence_submissions_request ON evidence_submissions(request_id);
"#;
