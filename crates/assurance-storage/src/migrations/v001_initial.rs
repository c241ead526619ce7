//! V001: template catalog, PCI instances, control instances, risk responses.

pub const MIGRATION_SQL: &str = r#"
-- Immutable catalog of attestable secondary controls.
CREATE TABLE IF NOT EXISTS control_templates (
    id TEXT PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    dimension TEXT NOT NULL,
    criticality TEXT NOT NULL,
    prompt TEXT NOT NULL,
    sort_order INTEGER NOT NULL DEFAULT 0
) STRICT;

-- One control deployed against one risk.
CREATE TABLE IF NOT EXISTS pci_instances (
    id TEXT PRIMARY KEY,
    risk_id TEXT NOT NULL,
    name TEXT NOT NULL,
    objective TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'draft',
    created_at TEXT NOT NULL,
    activated_at TEXT,
    retired_at TEXT
) STRICT;

CREATE INDEX IF NOT EXISTS idx_pci_instances_risk ON pci_instances(risk_id);

-- Attestable answers; one per (instance, template). Never deleted.
CREATE TABLE IF NOT EXISTS control_instances (
    id TEXT PRIMARY KEY,
    pci_instance_id TEXT NOT NULL REFERENCES pci_instances(id),
    template_id TEXT NOT NULL REFERENCES control_templates(id),
    status TEXT NOT NULL DEFAULT 'not_attested',
    evidence_exists INTEGER NOT NULL DEFAULT 0,
    notes TEXT,
    na_rationale TEXT,
    attested_at TEXT,
    version INTEGER NOT NULL DEFAULT 0,
    UNIQUE (pci_instance_id, template_id)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_control_instances_pci ON control_instances(pci_instance_id);

-- Declared treatment, one per risk. ai_proposed is JSON.
CREATE TABLE IF NOT EXISTS risk_responses (
    risk_id TEXT PRIMARY KEY,
    response_type TEXT NOT NULL,
    rationale TEXT,
    ai_proposed TEXT,
    updated_at TEXT NOT NULL
) STRICT;
"#;
