//! # Inbound Ports
//!
//! API trait defining what the dispatcher can do.

use crate::domain::{DispatchError, Dispatched};
use async_trait::async_trait;
use shared_types::{
    CapabilityToken, ReportCommand, ReportId, ReportStatus, UnitCode, UnitCommand,
    UnitCommandKind, UnitStatus,
};
use wt_01_unit_lifecycle::{NewUnit, Unit};
use wt_02_report_triage::{NewReport, Report};

/// Command API - inbound port.
///
/// Every method except `submit_report` resolves the token first.
#[async_trait]
pub trait CommandApi: Send + Sync {
    /// Register a unit (PRODUCER).
    async fn create_unit(
        &self,
        token: &CapabilityToken,
        new: NewUnit,
    ) -> Result<Dispatched<Unit>, DispatchError>;

    /// Issue a unit command.
    async fn dispatch_unit(
        &self,
        token: &CapabilityToken,
        code: &UnitCode,
        command: UnitCommand,
    ) -> Result<Dispatched<Unit>, DispatchError>;

    /// Reject a unit with a reason given as text (INSPECTOR).
    ///
    /// The reason is parsed only after the credential, role and state table
    /// have passed, so a bad reason is `InvalidPayload` and nothing earlier.
    async fn reject_unit(
        &self,
        token: &CapabilityToken,
        code: &UnitCode,
        reason: &str,
    ) -> Result<Dispatched<Unit>, DispatchError>;

    /// File a report. No credential required.
    async fn submit_report(&self, new: NewReport) -> Result<Dispatched<Report>, DispatchError>;

    /// Issue a triage command, optionally attaching notes (ADMIN).
    async fn dispatch_report(
        &self,
        token: &CapabilityToken,
        id: ReportId,
        command: ReportCommand,
        notes: Option<String>,
    ) -> Result<Dispatched<Report>, DispatchError>;

    /// Append notes without a transition (ADMIN).
    async fn annotate_report(
        &self,
        token: &CapabilityToken,
        id: ReportId,
        notes: String,
    ) -> Result<Report, DispatchError>;

    /// Read one report (ADMIN).
    async fn read_report(
        &self,
        token: &CapabilityToken,
        id: ReportId,
    ) -> Result<Report, DispatchError>;

    /// List reports, optionally by status (ADMIN).
    async fn list_reports(
        &self,
        token: &CapabilityToken,
        status: Option<ReportStatus>,
    ) -> Result<Vec<Report>, DispatchError>;

    /// Units in `status`, if the caller's role works from that status.
    async fn unit_queue(
        &self,
        token: &CapabilityToken,
        status: UnitStatus,
    ) -> Result<Vec<Unit>, DispatchError>;

    /// Unit commands the caller may issue right now.
    async fn allowed_unit_commands(
        &self,
        token: &CapabilityToken,
        code: &UnitCode,
    ) -> Result<Vec<UnitCommandKind>, DispatchError>;
}
