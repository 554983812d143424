//! # Trace Surface
//!
//! Entry points handed to the UI or API layer. One method per row of the
//! unit and report tables, plus creation, annotation, submission, lookup and
//! the capability queries the UI uses to decide what to show.
//!
//! Codes and ids arrive as text; a malformed target is an `InvalidPayload`
//! on the command surface and a plain `NotFound` on the verification surface.

use std::sync::Arc;

use shared_types::{
    CapabilityToken, ReportCommand, ReportId, ReportStatus, UnitCode,
    UnitCommand, UnitCommandKind, UnitStatus, UnitType,
};
use wt_01_unit_lifecycle::{NewUnit, Unit};
use wt_02_report_triage::{NewReport, Report};
use wt_03_command_dispatch::{CommandApi, DispatchError, Dispatched};
use wt_04_verification::{UnitView, VerificationApi, VerificationError};

/// Exposed command, verification and report surfaces.
pub struct TraceSurface {
    commands: Arc<dyn CommandApi>,
    verification: Arc<dyn VerificationApi>,
}

fn unit_code(raw: &str) -> Result<UnitCode, DispatchError> {
    UnitCode::parse(raw).map_err(|e| DispatchError::InvalidPayload(e.to_string()))
}

fn report_id(raw: &str) -> Result<ReportId, DispatchError> {
    raw.trim()
        .parse()
        .map_err(|_| DispatchError::InvalidPayload(format!("malformed report id {:?}", raw)))
}

impl TraceSurface {
    /// Create a surface over the given services.
    pub fn new(commands: Arc<dyn CommandApi>, verification: Arc<dyn VerificationApi>) -> Self {
        Self {
            commands,
            verification,
        }
    }

    async fn unit_command(
        &self,
        token: &CapabilityToken,
        code: &str,
        command: UnitCommand,
    ) -> Result<Dispatched<Unit>, DispatchError> {
        let code = unit_code(code)?;
        self.commands.dispatch_unit(token, &code, command).await
    }

    async fn report_command(
        &self,
        token: &CapabilityToken,
        id: &str,
        command: ReportCommand,
        notes: Option<String>,
    ) -> Result<Dispatched<Report>, DispatchError> {
        let id = report_id(id)?;
        self.commands.dispatch_report(token, id, command, notes).await
    }

    // =========================================================================
    // UNIT SURFACE
    // =========================================================================

    /// Register a unit. `code` is generated when absent.
    pub async fn create_unit(
        &self,
        token: &CapabilityToken,
        code: Option<&str>,
        unit_type: UnitType,
        quantity: u32,
    ) -> Result<Dispatched<Unit>, DispatchError> {
        let new = NewUnit {
            code: code.map(str::to_string),
            unit_type,
            quantity,
        };
        self.commands.create_unit(token, new).await
    }

    /// CREATED → INSPECTOR (PRODUCER or INSPECTOR).
    pub async fn submit_for_inspection(
        &self,
        token: &CapabilityToken,
        code: &str,
    ) -> Result<Dispatched<Unit>, DispatchError> {
        self.unit_command(token, code, UnitCommand::SubmitForInspection)
            .await
    }

    /// INSPECTOR → APPROVED (INSPECTOR).
    pub async fn approve(
        &self,
        token: &CapabilityToken,
        code: &str,
    ) -> Result<Dispatched<Unit>, DispatchError> {
        self.unit_command(token, code, UnitCommand::Approve).await
    }

    /// INSPECTOR → REJECTED_{reason} (INSPECTOR).
    ///
    /// `reason` is matched case-insensitively against the closed set, after
    /// the credential, role and state checks.
    pub async fn reject(
        &self,
        token: &CapabilityToken,
        code: &str,
        reason: &str,
    ) -> Result<Dispatched<Unit>, DispatchError> {
        let code = unit_code(code)?;
        self.commands.reject_unit(token, &code, reason).await
    }

    /// APPROVED → DISTRIBUTED (DISTRIBUTOR).
    pub async fn distribute(
        &self,
        token: &CapabilityToken,
        code: &str,
    ) -> Result<Dispatched<Unit>, DispatchError> {
        self.unit_command(token, code, UnitCommand::Distribute).await
    }

    /// DISTRIBUTED → SOLD (DISTRIBUTOR).
    pub async fn sell(
        &self,
        token: &CapabilityToken,
        code: &str,
    ) -> Result<Dispatched<Unit>, DispatchError> {
        self.unit_command(token, code, UnitCommand::Sell).await
    }

    /// Commands the caller may issue on `code` right now.
    pub async fn allowed_commands(
        &self,
        token: &CapabilityToken,
        code: &str,
    ) -> Result<Vec<UnitCommandKind>, DispatchError> {
        let code = unit_code(code)?;
        self.commands.allowed_unit_commands(token, &code).await
    }

    /// Units waiting in `status`, for roles that work from it.
    pub async fn unit_queue(
        &self,
        token: &CapabilityToken,
        status: UnitStatus,
    ) -> Result<Vec<Unit>, DispatchError> {
        self.commands.unit_queue(token, status).await
    }

    // =========================================================================
    // REPORT SURFACE
    // =========================================================================

    /// File a report. No credential needed.
    pub async fn submit_report(&self, new: NewReport) -> Result<Dispatched<Report>, DispatchError> {
        self.commands.submit_report(new).await
    }

    /// PENDING → INVESTIGATING (ADMIN).
    pub async fn start_investigation(
        &self,
        token: &CapabilityToken,
        id: &str,
        notes: Option<String>,
    ) -> Result<Dispatched<Report>, DispatchError> {
        self.report_command(token, id, ReportCommand::StartInvestigation, notes)
            .await
    }

    /// PENDING or INVESTIGATING → DISMISSED (ADMIN).
    pub async fn dismiss(
        &self,
        token: &CapabilityToken,
        id: &str,
        notes: Option<String>,
    ) -> Result<Dispatched<Report>, DispatchError> {
        self.report_command(token, id, ReportCommand::Dismiss, notes)
            .await
    }

    /// INVESTIGATING → RESOLVED (ADMIN).
    pub async fn resolve(
        &self,
        token: &CapabilityToken,
        id: &str,
        notes: Option<String>,
    ) -> Result<Dispatched<Report>, DispatchError> {
        self.report_command(token, id, ReportCommand::Resolve, notes)
            .await
    }

    /// DISMISSED → PENDING (ADMIN).
    pub async fn reopen(
        &self,
        token: &CapabilityToken,
        id: &str,
        notes: Option<String>,
    ) -> Result<Dispatched<Report>, DispatchError> {
        self.report_command(token, id, ReportCommand::Reopen, notes)
            .await
    }

    /// Append notes without changing status (ADMIN).
    pub async fn annotate(
        &self,
        token: &CapabilityToken,
        id: &str,
        notes: String,
    ) -> Result<Report, DispatchError> {
        let id = report_id(id)?;
        self.commands.annotate_report(token, id, notes).await
    }

    /// One report (ADMIN).
    pub async fn report(&self, token: &CapabilityToken, id: &str) -> Result<Report, DispatchError> {
        let id = report_id(id)?;
        self.commands.read_report(token, id).await
    }

    /// Reports, optionally by status (ADMIN).
    pub async fn reports(
        &self,
        token: &CapabilityToken,
        status: Option<ReportStatus>,
    ) -> Result<Vec<Report>, DispatchError> {
        self.commands.list_reports(token, status).await
    }

    // =========================================================================
    // VERIFICATION SURFACE
    // =========================================================================

    /// Public lookup. No credential needed.
    pub async fn verify(&self, code: &str) -> Result<UnitView, VerificationError> {
        self.verification.verify(code).await
    }
}
