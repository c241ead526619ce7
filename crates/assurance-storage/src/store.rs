//! SqliteStore: `AssuranceStore` over rusqlite.
//!
//! Reads go through the reader connection; every write, single or
//! multi-row, runs inside one transaction on the serialized writer, so a
//! failed call leaves the database untouched.

use std::path::Path;
use std::time::Instant;

use assurance_core::config::StorageConfig;
use assurance_core::errors::AssuranceResult;
use assurance_core::models::{
    EvidenceCommit, EvidenceRequest, EvidenceSubmission, PciInstance, PciStatus, RiskResponse,
    SecondaryControlInstance, SecondaryControlTemplate,
};
use assurance_core::traits::{AssuranceStore, AttestationWrite};
use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::connection::{sqlite_error, DatabaseManager};
use crate::queries::{controls, evidence, pci, responses, templates};

pub struct SqliteStore {
    db: DatabaseManager,
}

impl SqliteStore {
    pub fn open(path: &Path) -> AssuranceResult<Self> {
        Ok(Self {
            db: DatabaseManager::open(path)?,
        })
    }

    pub fn open_in_memory() -> AssuranceResult<Self> {
        Ok(Self {
            db: DatabaseManager::open_in_memory()?,
        })
    }

    /// Open the database named by the storage config, in memory if none.
    pub fn from_config(config: &StorageConfig) -> AssuranceResult<Self> {
        let db = match &config.database_path {
            Some(path) => DatabaseManager::open_with_timeout(path, config.effective_busy_timeout_ms())?,
            None => DatabaseManager::open_in_memory()?,
        };
        Ok(Self { db })
    }

    pub fn database(&self) -> &DatabaseManager {
        &self.db
    }

    /// Run `f` in a write transaction; commit on success, roll back otherwise.
    fn transact<F, T>(&self, operation: &'static str, f: F) -> AssuranceResult<T>
    where
        F: FnOnce(&Connection) -> AssuranceResult<T>,
    {
        let started = Instant::now();
        let result = self.db.with_writer(|conn| {
            let tx = conn.unchecked_transaction().map_err(sqlite_error)?;
            let value = f(&*tx)?;
            tx.commit().map_err(sqlite_error)?;
            Ok(value)
        });
        tracing::debug!(
            operation,
            ok = result.is_ok(),
            store_write_time_ms = started.elapsed().as_millis() as u64,
            "store write"
        );
        result
    }
}

impl AssuranceStore for SqliteStore {
    fn insert_templates(&self, items: &[SecondaryControlTemplate]) -> AssuranceResult<()> {
        self.transact("insert_templates", |conn| {
            items
                .iter()
                .try_for_each(|template| templates::insert_template(conn, template))
        })
    }

    fn list_templates(&self) -> AssuranceResult<Vec<SecondaryControlTemplate>> {
        self.db.with_reader(templates::list_templates)
    }

    fn create_pci_instance(
        &self,
        instance: &PciInstance,
        items: &[SecondaryControlInstance],
    ) -> AssuranceResult<()> {
        self.transact("create_pci_instance", |conn| {
            pci::insert_pci_instance(conn, instance)?;
            items
                .iter()
                .try_for_each(|control| controls::insert_control(conn, control))
        })
    }

    fn get_pci_instance(&self, id: &str) -> AssuranceResult<Option<PciInstance>> {
        self.db.with_reader(|conn| pci::get_pci_instance(conn, id))
    }

    fn list_pci_instances(&self, risk_id: &str) -> AssuranceResult<Vec<PciInstance>> {
        self.db.with_reader(|conn| pci::list_pci_instances(conn, risk_id))
    }

    fn update_pci_status(
        &self,
        id: &str,
        from: PciStatus,
        to: PciStatus,
        at: DateTime<Utc>,
    ) -> AssuranceResult<()> {
        self.transact("update_pci_status", |conn| {
            pci::update_pci_status(conn, id, from, to, &at)
        })
    }

    fn list_controls(&self, pci_instance_id: &str) -> AssuranceResult<Vec<SecondaryControlInstance>> {
        self.db
            .with_reader(|conn| controls::list_controls(conn, pci_instance_id))
    }

    fn get_control(&self, id: &str) -> AssuranceResult<Option<SecondaryControlInstance>> {
        self.db.with_reader(|conn| controls::get_control(conn, id))
    }

    fn apply_attestations(&self, writes: &[AttestationWrite]) -> AssuranceResult<()> {
        self.transact("apply_attestations", |conn| {
            writes
                .iter()
                .try_for_each(|write| controls::apply_attestation(conn, write))
        })
    }

    fn insert_evidence_request(&self, request: &EvidenceRequest) -> AssuranceResult<()> {
        self.transact("insert_evidence_request", |conn| {
            evidence::insert_request(conn, request)
        })
    }

    fn get_evidence_request(&self, id: &str) -> AssuranceResult<Option<EvidenceRequest>> {
        self.db.with_reader(|conn| evidence::get_request(conn, id))
    }

    fn list_evidence_requests(&self, risk_id: &str) -> AssuranceResult<Vec<EvidenceRequest>> {
        self.db
            .with_reader(|conn| evidence::list_requests_for_risk(conn, risk_id))
    }

    fn list_submissions(&self, request_id: &str) -> AssuranceResult<Vec<EvidenceSubmission>> {
        self.db
            .with_reader(|conn| evidence::list_submissions(conn, request_id))
    }

    fn commit_evidence_transition(&self, commit: &EvidenceCommit) -> AssuranceResult<()> {
        self.transact("commit_evidence_transition", |conn| {
            evidence::apply_commit(conn, commit)
        })
    }

    fn get_risk_response(&self, risk_id: &str) -> AssuranceResult<Option<RiskResponse>> {
        self.db
            .with_reader(|conn| responses::get_risk_response(conn, risk_id))
    }

    fn upsert_risk_response(&self, response: &RiskResponse) -> AssuranceResult<()> {
        self.transact("upsert_risk_response", |conn| {
            responses::upsert_risk_response(conn, response)
        })
    }
}
