//! Entity Store Adapter
//!
//! Implements `UnitStore` and `ReportStore` in memory. Each write takes the
//! map's write lock for the whole compare-and-set, which gives the
//! single-writer-per-entity serialization the dispatcher relies on.

use crate::domain::StoreError;
use crate::ports::outbound::{ReportStore, UnitStore};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{
    ReportId, ReportStatus, ReportTransition, Timestamp, UnitCode, UnitStatus, UnitTransition,
};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;
use wt_01_unit_lifecycle::{Unit, UnitHistory};
use wt_02_report_triage::Report;

#[derive(Clone, Debug)]
struct ReportEntry {
    report: Report,
    history: Vec<ReportTransition>,
}

/// In-memory unit and report store.
pub struct InMemoryEntityStore {
    units: RwLock<BTreeMap<UnitCode, UnitHistory>>,
    reports: RwLock<HashMap<ReportId, ReportEntry>>,
}

impl InMemoryEntityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            units: RwLock::new(BTreeMap::new()),
            reports: RwLock::new(HashMap::new()),
        }
    }

    /// Load a unit with its recorded history as-is, replacing any existing
    /// entry. Used when restoring from an external ledger export; nothing
    /// is validated.
    pub fn restore_unit(&self, history: UnitHistory) {
        debug!(code = %history.unit.code, records = history.transitions.len(), "Unit restored");
        self.units.write().insert(history.unit.code.clone(), history);
    }

    /// Number of stored units.
    pub fn unit_count(&self) -> usize {
        self.units.read().len()
    }

    /// Number of stored reports.
    pub fn report_count(&self) -> usize {
        self.reports.read().len()
    }
}

impl Default for InMemoryEntityStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UnitStore for InMemoryEntityStore {
    async fn read_unit(&self, code: &UnitCode) -> Result<Unit, StoreError> {
        self.units
            .read()
            .get(code)
            .map(|h| h.unit.clone())
            .ok_or_else(|| StoreError::NotFound(code.to_string()))
    }

    async fn insert_unit(&self, unit: Unit, record: UnitTransition) -> Result<(), StoreError> {
        let mut units = self.units.write();
        if units.contains_key(&unit.code) {
            return Err(StoreError::AlreadyExists(unit.code.to_string()));
        }
        debug!(code = %unit.code, "Unit inserted");
        units.insert(unit.code.clone(), UnitHistory::new(unit, vec![record]));
        Ok(())
    }

    async fn commit_unit(
        &self,
        expected: UnitStatus,
        unit: Unit,
        record: UnitTransition,
    ) -> Result<(), StoreError> {
        let mut units = self.units.write();
        let entry = units
            .get_mut(&unit.code)
            .ok_or_else(|| StoreError::NotFound(unit.code.to_string()))?;
        if entry.unit.status != expected {
            return Err(StoreError::Conflict(format!(
                "unit {} is {}, expected {}",
                unit.code, entry.unit.status, expected
            )));
        }
        debug!(code = %unit.code, from = %expected, to = %unit.status, "Unit committed");
        entry.unit = unit;
        entry.transitions.push(record);
        Ok(())
    }

    async fn unit_history(&self, code: &UnitCode) -> Result<UnitHistory, StoreError> {
        self.units
            .read()
            .get(code)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(code.to_string()))
    }

    async fn list_units(&self, status: Option<UnitStatus>) -> Result<Vec<Unit>, StoreError> {
        Ok(self
            .units
            .read()
            .values()
            .filter(|h| status.map_or(true, |s| h.unit.status == s))
            .map(|h| h.unit.clone())
            .collect())
    }
}

#[async_trait]
impl ReportStore for InMemoryEntityStore {
    async fn read_report(&self, id: ReportId) -> Result<Report, StoreError> {
        self.reports
            .read()
            .get(&id)
            .map(|e| e.report.clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn insert_report(
        &self,
        report: Report,
        record: ReportTransition,
    ) -> Result<(), StoreError> {
        let mut reports = self.reports.write();
        if reports.contains_key(&report.id) {
            return Err(StoreError::AlreadyExists(report.id.to_string()));
        }
        debug!(report_id = %report.id, "Report inserted");
        reports.insert(
            report.id,
            ReportEntry {
                report,
                history: vec![record],
            },
        );
        Ok(())
    }

    async fn commit_report(
        &self,
        expected_revision: Timestamp,
        report: Report,
        record: Option<ReportTransition>,
    ) -> Result<(), StoreError> {
        let mut reports = self.reports.write();
        let entry = reports
            .get_mut(&report.id)
            .ok_or_else(|| StoreError::NotFound(report.id.to_string()))?;
        if entry.report.last_modified_at != expected_revision {
            return Err(StoreError::Conflict(format!(
                "report {} changed since revision {}",
                report.id, expected_revision
            )));
        }
        debug!(report_id = %report.id, status = %report.status, "Report committed");
        entry.report = report;
        entry.history.extend(record);
        Ok(())
    }

    async fn report_history(&self, id: ReportId) -> Result<Vec<ReportTransition>, StoreError> {
        self.reports
            .read()
            .get(&id)
            .map(|e| e.history.clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn list_reports(&self, status: Option<ReportStatus>) -> Result<Vec<Report>, StoreError> {
        let mut reports: Vec<Report> = self
            .reports
            .read()
            .values()
            .filter(|e| status.map_or(true, |s| e.report.status == s))
            .map(|e| e.report.clone())
            .collect();
        reports.sort_by(|a, b| a.reported_at.cmp(&b.reported_at).then(a.id.cmp(&b.id)));
        Ok(reports)
    }
}
