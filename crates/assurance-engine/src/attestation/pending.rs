//! `PendingAttestationEdits`: unsaved answers keyed by control-instance id.
//!
//! Edits are staged against the version of the control they were based on,
//! turned into store writes on save, and thrown away on discard.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use assurance_core::errors::ValidationError;
use assurance_core::models::{AttestationStatus, SecondaryControlInstance};
use assurance_core::traits::AttestationWrite;

/// One staged answer for a control instance.
#[derive(Debug, Clone, PartialEq)]
pub struct AttestationEdit {
    pub control_id: String,
    pub base_version: u64,
    pub status: AttestationStatus,
    pub evidence_exists: bool,
    pub notes: Option<String>,
    pub na_rationale: Option<String>,
}

impl AttestationEdit {
    /// Start an edit from the control's current committed state.
    pub fn from_control(control: &SecondaryControlInstance) -> Self {
        Self {
            control_id: control.id.clone(),
            base_version: control.version,
            status: control.status,
            evidence_exists: control.evidence_exists,
            notes: control.notes.clone(),
            na_rationale: control.na_rationale.clone(),
        }
    }

    pub fn status(mut self, status: AttestationStatus) -> Self {
        self.status = status;
        self
    }

    pub fn evidence(mut self, evidence_exists: bool) -> Self {
        self.evidence_exists = evidence_exists;
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn na_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.na_rationale = Some(rationale.into());
        self
    }

    /// Mark not applicable with the mandatory rationale.
    pub fn not_applicable(self, rationale: impl Into<String>) -> Self {
        self.status(AttestationStatus::Na).na_rationale(rationale)
    }

    /// Validate and normalize into a store write.
    pub fn into_write(self, now: DateTime<Utc>) -> Result<AttestationWrite, ValidationError> {
        let na_rationale = self
            .na_rationale
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        let is_na = self.status == AttestationStatus::Na;
        if is_na && na_rationale.is_none() {
            return Err(ValidationError::MissingNaRationale {
                control: self.control_id,
            });
        }

        Ok(AttestationWrite {
            control_id: self.control_id,
            expected_version: self.base_version,
            status: self.status,
            evidence_exists: self.evidence_exists && !is_na,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
            na_rationale: if is_na { na_rationale } else { None },
            attested_at: self.status.is_attested().then_some(now),
        })
    }
}

/// Unsaved edits for one PCI instance.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAttestationEdits {
    pci_instance_id: String,
    edits: BTreeMap<String, AttestationEdit>,
}

impl PendingAttestationEdits {
    pub fn new(pci_instance_id: impl Into<String>) -> Self {
        Self {
            pci_instance_id: pci_instance_id.into(),
            edits: BTreeMap::new(),
        }
    }

    pub fn pci_instance_id(&self) -> &str {
        &self.pci_instance_id
    }

    /// Stage an edit, replacing any earlier edit of the same control.
    pub fn stage(&mut self, edit: AttestationEdit) {
        self.edits.insert(edit.control_id.clone(), edit);
    }

    pub fn unstage(&mut self, control_id: &str) -> Option<AttestationEdit> {
        self.edits.remove(control_id)
    }

    pub fn get(&self, control_id: &str) -> Option<&AttestationEdit> {
        self.edits.get(control_id)
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Drop every staged edit.
    pub fn discard(&mut self) {
        self.edits.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttestationEdit> {
        self.edits.values()
    }

    /// Validate every edit; on the first failure nothing is returned.
    /// Writes come out in control-id order.
    pub fn to_writes(&self, now: DateTime<Utc>) -> Result<Vec<AttestationWrite>, ValidationError> {
        self.edits
            .values()
            .cloned()
            .map(|edit| edit.into_write(now))
            .collect()
    }
}
