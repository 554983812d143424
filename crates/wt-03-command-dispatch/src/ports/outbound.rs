//! # Outbound Ports
//!
//! Collaborators the dispatcher depends on. Authoritative state lives behind
//! these traits; the dispatcher itself holds none.

use crate::domain::{CredentialError, LedgerError, LedgerReceipt, StoreError};
use async_trait::async_trait;
use shared_types::{
    CapabilityToken, Principal, ReportId, ReportStatus, ReportTransition, Timestamp,
    TransitionRecord, UnitCode, UnitStatus, UnitTransition,
};
use wt_01_unit_lifecycle::{Unit, UnitHistory};
use wt_02_report_triage::Report;

/// Credential resolution - outbound port.
///
/// Called on every command; results must never be cached across calls.
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    /// Resolve an opaque token to the principal it was issued to.
    async fn resolve(&self, token: &CapabilityToken) -> Result<Principal, CredentialError>;
}

/// Unit persistence - outbound port.
///
/// Must serialize writers per unit: `commit_unit` succeeds only while the
/// stored status still equals `expected`.
#[async_trait]
pub trait UnitStore: Send + Sync {
    /// Current state of a unit.
    async fn read_unit(&self, code: &UnitCode) -> Result<Unit, StoreError>;

    /// Store a new unit with its creation record. `AlreadyExists` if the code is taken.
    async fn insert_unit(&self, unit: Unit, record: UnitTransition) -> Result<(), StoreError>;

    /// Compare-and-set on status, appending the transition record.
    async fn commit_unit(
        &self,
        expected: UnitStatus,
        unit: Unit,
        record: UnitTransition,
    ) -> Result<(), StoreError>;

    /// Consistent snapshot of a unit and every record stored for it.
    async fn unit_history(&self, code: &UnitCode) -> Result<UnitHistory, StoreError>;

    /// Units, optionally filtered by status, ordered by code.
    async fn list_units(&self, status: Option<UnitStatus>) -> Result<Vec<Unit>, StoreError>;
}

/// Report persistence - outbound port.
///
/// Reports are versioned by `last_modified_at`; a commit succeeds only while
/// the stored revision still equals `expected_revision`, so concurrent
/// annotations cannot overwrite one another.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Current state of a report.
    async fn read_report(&self, id: ReportId) -> Result<Report, StoreError>;

    /// Store a new report with its submission record.
    async fn insert_report(&self, report: Report, record: ReportTransition)
        -> Result<(), StoreError>;

    /// Compare-and-set on revision. `record` is absent for annotations.
    async fn commit_report(
        &self,
        expected_revision: Timestamp,
        report: Report,
        record: Option<ReportTransition>,
    ) -> Result<(), StoreError>;

    /// Every transition stored for a report, oldest first.
    async fn report_history(&self, id: ReportId) -> Result<Vec<ReportTransition>, StoreError>;

    /// Reports, optionally filtered by status, oldest first.
    async fn list_reports(&self, status: Option<ReportStatus>) -> Result<Vec<Report>, StoreError>;
}

/// Ledger/audit sink - outbound port.
///
/// Append-only. An acknowledged append is treated as durable.
#[async_trait]
pub trait LedgerSink: Send + Sync {
    /// Append a transition record.
    async fn append(&self, record: &TransitionRecord) -> Result<LedgerReceipt, LedgerError>;
}

/// Time source - outbound port.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now(&self) -> Timestamp;
}
