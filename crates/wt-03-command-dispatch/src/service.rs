//! Command Dispatcher - Core business logic
//!
//! Every command runs the same pipeline:
//!
//! ```text
//! credential ─► role gate ─► read ─► state table ─► payload ─► commit ─► ledger ─► publish
//! ```
//!
//! The first failing step decides the error kind. Nothing is published for a
//! rejected command, and a command that fails before `commit` leaves the
//! store untouched. Once `commit` lands the event goes out even if the
//! ledger then fails.

use crate::domain::{queue_permits, DispatchError, Dispatched, LedgerReceipt, StoreError};
use crate::ports::inbound::CommandApi;
use crate::ports::outbound::{Clock, CredentialResolver, LedgerSink, ReportStore, UnitStore};
use async_trait::async_trait;
use shared_bus::{EventPublisher, TraceEvent};
use shared_types::{
    CapabilityToken, Principal, RejectionReason, ReportCommand, ReportId, ReportStatus, Role,
    TransitionRecord, UnitCode, UnitCommand, UnitCommandKind, UnitStatus,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use trace_telemetry::{
    log_report_event, log_unit_event, time_histogram, DISPATCH_ACCEPTED, DISPATCH_DURATION,
    DISPATCH_REJECTED,
};
use tracing::{debug, error};
use wt_01_unit_lifecycle::{self as lifecycle, NewUnit, Unit, CREATE_UNIT_ROLES};
use wt_02_report_triage::{
    self as triage, NewReport, Report, ANNOTATE_ROLES, DEFAULT_MAX_REASON_LEN, TRIAGE_READ_ROLES,
};

const SUBSYSTEM: &str = "dispatch";

/// Dispatcher configuration
#[derive(Clone, Debug)]
pub struct DispatchConfig {
    /// Upper bound on every collaborator call.
    pub collaborator_timeout: Duration,
    /// Maximum characters in a report reason or a single note.
    pub max_reason_len: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            collaborator_timeout: Duration::from_secs(2),
            max_reason_len: DEFAULT_MAX_REASON_LEN,
        }
    }
}

/// Unit command as it reached the dispatcher. A reject reason stays raw
/// text until the state table has accepted the command.
enum UnitPayload<'a> {
    Command(UnitCommand),
    RejectReason(&'a str),
}

impl UnitPayload<'_> {
    fn kind(&self) -> UnitCommandKind {
        match self {
            Self::Command(command) => command.kind(),
            Self::RejectReason(_) => UnitCommandKind::Reject,
        }
    }

    fn into_command(self) -> Result<UnitCommand, DispatchError> {
        match self {
            Self::Command(command) => Ok(command),
            Self::RejectReason(text) => text
                .parse::<RejectionReason>()
                .map(|reason| UnitCommand::Reject { reason })
                .map_err(|e| DispatchError::InvalidPayload(e.to_string())),
        }
    }
}

/// Command Dispatcher implementation
///
/// Holds no entity state of its own. Credentials, stores and the ledger are
/// reached through the outbound ports on every call.
pub struct CommandDispatcher<C, U, R, L>
where
    C: CredentialResolver,
    U: UnitStore,
    R: ReportStore,
    L: LedgerSink,
{
    config: DispatchConfig,
    credentials: Arc<C>,
    units: Arc<U>,
    reports: Arc<R>,
    ledger: Arc<L>,
    clock: Arc<dyn Clock>,
    bus: Arc<dyn EventPublisher>,
    /// Held from commit through ledger append.
    ledger_lane: Mutex<()>,
}

impl<C, U, R, L> CommandDispatcher<C, U, R, L>
where
    C: CredentialResolver,
    U: UnitStore,
    R: ReportStore,
    L: LedgerSink,
{
    /// Create a new dispatcher
    pub fn new(
        config: DispatchConfig,
        credentials: Arc<C>,
        units: Arc<U>,
        reports: Arc<R>,
        ledger: Arc<L>,
        clock: Arc<dyn Clock>,
        bus: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            config,
            credentials,
            units,
            reports,
            ledger,
            clock,
            bus,
            ledger_lane: Mutex::new(()),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    // =========================================================================
    // COLLABORATOR ACCESS
    // =========================================================================

    /// Await a collaborator call, bounded by the configured timeout.
    async fn bounded<T, E, F>(&self, collaborator: &'static str, call: F) -> Result<T, DispatchError>
    where
        F: Future<Output = Result<T, E>>,
        DispatchError: From<E>,
    {
        match tokio::time::timeout(self.config.collaborator_timeout, call).await {
            Ok(result) => result.map_err(DispatchError::from),
            Err(_) => Err(DispatchError::Unavailable(format!(
                "{} did not answer within {:?}",
                collaborator, self.config.collaborator_timeout
            ))),
        }
    }

    async fn authenticate(&self, token: &CapabilityToken) -> Result<Principal, DispatchError> {
        self.bounded("credential service", self.credentials.resolve(token))
            .await
    }

    fn gate(principal: &Principal, roles: &[Role], command: &str) -> Result<(), DispatchError> {
        if roles.contains(&principal.role) {
            Ok(())
        } else {
            Err(DispatchError::forbidden(principal.role, command))
        }
    }

    fn check_notes_len(&self, notes: Option<&str>) -> Result<(), DispatchError> {
        let len = notes.map_or(0, |n| n.trim().chars().count());
        if len > self.config.max_reason_len {
            return Err(DispatchError::InvalidPayload(format!(
                "notes too long: {} > {}",
                len, self.config.max_reason_len
            )));
        }
        Ok(())
    }

    /// Append after a successful commit. The store already holds the new
    /// state, so a failure here is loud but does not roll anything back.
    async fn append(&self, record: TransitionRecord) -> Result<LedgerReceipt, DispatchError> {
        let key = record.entity_key();
        match self.bounded("ledger", self.ledger.append(&record)).await {
            Ok(receipt) => Ok(receipt),
            Err(err) => {
                error!(
                    subsystem = SUBSYSTEM,
                    entity = %key,
                    error = %err,
                    "Ledger append failed after commit"
                );
                Err(DispatchError::Unavailable(format!(
                    "transition for {} committed but not acknowledged by ledger: {}",
                    key, err
                )))
            }
        }
    }

    /// Commit, then append, inside the ledger lane so the ledger lists
    /// records in the order the store accepted them.
    ///
    /// The outer error means the commit failed and nothing changed. The
    /// inner one means the state is committed but the ledger did not
    /// acknowledge it.
    async fn commit_and_append<F>(
        &self,
        store: &'static str,
        commit: F,
        record: TransitionRecord,
    ) -> Result<Result<LedgerReceipt, DispatchError>, DispatchError>
    where
        F: Future<Output = Result<(), StoreError>>,
    {
        let _lane = self.ledger_lane.lock().await;
        self.bounded(store, commit).await?;
        Ok(self.append(record).await)
    }

    fn observe<T>(entity: &'static str, command: &str, result: &Result<T, DispatchError>) {
        match result {
            Ok(_) => DISPATCH_ACCEPTED.with_label_values(&[entity, command]).inc(),
            Err(err) => DISPATCH_REJECTED.with_label_values(&[err.kind().as_str()]).inc(),
        }
    }

    // =========================================================================
    // UNIT COMMANDS
    // =========================================================================

    async fn run_create_unit(
        &self,
        token: &CapabilityToken,
        new: NewUnit,
    ) -> Result<Dispatched<Unit>, DispatchError> {
        let principal = self.authenticate(token).await?;
        Self::gate(&principal, CREATE_UNIT_ROLES, "create-unit")?;

        let (unit, record) = Unit::create(&new, &principal, self.clock.now())?;
        let appended = self
            .commit_and_append(
                "unit store",
                self.units.insert_unit(unit.clone(), record.clone()),
                TransitionRecord::Unit(record.clone()),
            )
            .await?;

        log_unit_event!(
            info,
            SUBSYSTEM,
            "Unit created",
            unit.code,
            role = %principal.role,
            unit_type = ?unit.unit_type,
            quantity = unit.quantity
        );
        self.bus.publish(TraceEvent::UnitCreated(record)).await;
        Ok(Dispatched {
            state: unit,
            receipt: appended?,
        })
    }

    async fn run_unit_command(
        &self,
        token: &CapabilityToken,
        code: &UnitCode,
        payload: UnitPayload<'_>,
    ) -> Result<Dispatched<Unit>, DispatchError> {
        let principal = self.authenticate(token).await?;
        let kind = payload.kind();
        Self::gate(&principal, lifecycle::required_roles(kind), kind.as_str())?;

        let current = self
            .bounded("unit store", self.units.read_unit(code))
            .await?;
        lifecycle::ensure_legal(current.status, kind)?;
        let command = payload.into_command()?;
        let (next, record) = current.apply(&command, &principal, self.clock.now())?;

        let committed = self
            .commit_and_append(
                "unit store",
                self.units
                    .commit_unit(current.status, next.clone(), record.clone()),
                TransitionRecord::Unit(record.clone()),
            )
            .await;
        let appended = match committed {
            Ok(appended) => appended,
            Err(DispatchError::Conflict(detail)) => {
                return Err(self.revalidate_unit(code, &command, detail).await)
            }
            Err(err) => return Err(err),
        };

        log_unit_event!(
            info,
            SUBSYSTEM,
            "Unit transitioned",
            code,
            role = %principal.role,
            command = kind.as_str(),
            from = %current.status,
            to = %next.status
        );
        self.bus.publish(TraceEvent::UnitTransitioned(record)).await;
        Ok(Dispatched {
            state: next,
            receipt: appended?,
        })
    }

    /// After losing a compare-and-set, decide whether the command is now
    /// illegal or merely raced.
    async fn revalidate_unit(
        &self,
        code: &UnitCode,
        command: &UnitCommand,
        detail: String,
    ) -> DispatchError {
        match self.bounded("unit store", self.units.read_unit(code)).await {
            Ok(fresh) => match lifecycle::transition(fresh.status, command) {
                Err(illegal) => illegal.into(),
                Ok(_) => DispatchError::Conflict(detail),
            },
            Err(err) => err,
        }
    }

    async fn observed_unit_command(
        &self,
        token: &CapabilityToken,
        code: &UnitCode,
        payload: UnitPayload<'_>,
    ) -> Result<Dispatched<Unit>, DispatchError> {
        let _timer = time_histogram!(DISPATCH_DURATION);
        let name = payload.kind().as_str();
        let result = self.run_unit_command(token, code, payload).await;
        if let Err(err) = &result {
            log_unit_event!(warn, SUBSYSTEM, "Unit command rejected", code, command = name, kind = err.kind().as_str(), error = %err);
        }
        Self::observe("unit", name, &result);
        result
    }

    // =========================================================================
    // REPORT COMMANDS
    // =========================================================================

    async fn run_submit_report(&self, new: NewReport) -> Result<Dispatched<Report>, DispatchError> {
        let (report, record) = Report::submit(
            &new,
            ReportId::new(),
            self.clock.now(),
            self.config.max_reason_len,
        )?;
        let appended = self
            .commit_and_append(
                "report store",
                self.reports.insert_report(report.clone(), record.clone()),
                TransitionRecord::Report(record),
            )
            .await?;

        log_report_event!(
            info,
            SUBSYSTEM,
            "Report submitted",
            report.id,
            subject = ?report.subject_code
        );
        self.bus
            .publish(TraceEvent::ReportSubmitted {
                report_id: report.id,
                subject_code: report
                    .subject_code
                    .as_deref()
                    .and_then(|s| UnitCode::parse(s).ok()),
                at: report.reported_at,
            })
            .await;
        Ok(Dispatched {
            state: report,
            receipt: appended?,
        })
    }

    async fn run_report_command(
        &self,
        token: &CapabilityToken,
        id: ReportId,
        command: ReportCommand,
        notes: Option<String>,
    ) -> Result<Dispatched<Report>, DispatchError> {
        let principal = self.authenticate(token).await?;
        Self::gate(&principal, triage::required_roles(command), command.as_str())?;

        let current = self
            .bounded("report store", self.reports.read_report(id))
            .await?;
        let (next, record) =
            current.apply(command, notes.as_deref(), &principal, self.clock.now())?;
        self.check_notes_len(notes.as_deref())?;

        let committed = self
            .commit_and_append(
                "report store",
                self.reports.commit_report(
                    current.last_modified_at,
                    next.clone(),
                    Some(record.clone()),
                ),
                TransitionRecord::Report(record.clone()),
            )
            .await;
        let appended = match committed {
            Ok(appended) => appended,
            Err(DispatchError::Conflict(detail)) => {
                return Err(self.revalidate_report(id, command, detail).await)
            }
            Err(err) => return Err(err),
        };

        log_report_event!(
            info,
            SUBSYSTEM,
            "Report transitioned",
            id,
            role = %principal.role,
            command = command.as_str(),
            from = %current.status,
            to = %next.status
        );
        self.bus.publish(TraceEvent::ReportTransitioned(record)).await;
        Ok(Dispatched {
            state: next,
            receipt: appended?,
        })
    }

    async fn revalidate_report(
        &self,
        id: ReportId,
        command: ReportCommand,
        detail: String,
    ) -> DispatchError {
        match self.bounded("report store", self.reports.read_report(id)).await {
            Ok(fresh) => match triage::transition(fresh.status, command) {
                Err(illegal) => illegal.into(),
                Ok(_) => DispatchError::Conflict(detail),
            },
            Err(err) => err,
        }
    }

    async fn run_annotate(
        &self,
        token: &CapabilityToken,
        id: ReportId,
        notes: String,
    ) -> Result<Report, DispatchError> {
        let principal = self.authenticate(token).await?;
        Self::gate(&principal, ANNOTATE_ROLES, "annotate")?;

        let current = self
            .bounded("report store", self.reports.read_report(id))
            .await?;
        let next = current.annotate(&notes, self.clock.now())?;
        self.check_notes_len(Some(&notes))?;

        self.bounded(
            "report store",
            self.reports
                .commit_report(current.last_modified_at, next.clone(), None),
        )
        .await?;

        log_report_event!(info, SUBSYSTEM, "Report annotated", id, role = %principal.role);
        self.bus
            .publish(TraceEvent::ReportAnnotated {
                report_id: id,
                actor: principal.id,
                at: next.last_modified_at,
            })
            .await;
        Ok(next)
    }
}

#[async_trait]
impl<C, U, R, L> CommandApi for CommandDispatcher<C, U, R, L>
where
    C: CredentialResolver + 'static,
    U: UnitStore + 'static,
    R: ReportStore + 'static,
    L: LedgerSink + 'static,
{
    async fn create_unit(
        &self,
        token: &CapabilityToken,
        new: NewUnit,
    ) -> Result<Dispatched<Unit>, DispatchError> {
        let _timer = time_histogram!(DISPATCH_DURATION);
        let result = self.run_create_unit(token, new).await;
        if let Err(err) = &result {
            log_event_rejected("unit", "create-unit", err);
        }
        Self::observe("unit", "create-unit", &result);
        result
    }

    async fn dispatch_unit(
        &self,
        token: &CapabilityToken,
        code: &UnitCode,
        command: UnitCommand,
    ) -> Result<Dispatched<Unit>, DispatchError> {
        self.observed_unit_command(token, code, UnitPayload::Command(command))
            .await
    }

    async fn reject_unit(
        &self,
        token: &CapabilityToken,
        code: &UnitCode,
        reason: &str,
    ) -> Result<Dispatched<Unit>, DispatchError> {
        self.observed_unit_command(token, code, UnitPayload::RejectReason(reason))
            .await
    }

    async fn submit_report(&self, new: NewReport) -> Result<Dispatched<Report>, DispatchError> {
        let _timer = time_histogram!(DISPATCH_DURATION);
        let result = self.run_submit_report(new).await;
        if let Err(err) = &result {
            log_event_rejected("report", "submit", err);
        }
        Self::observe("report", "submit", &result);
        result
    }

    async fn dispatch_report(
        &self,
        token: &CapabilityToken,
        id: ReportId,
        command: ReportCommand,
        notes: Option<String>,
    ) -> Result<Dispatched<Report>, DispatchError> {
        let _timer = time_histogram!(DISPATCH_DURATION);
        let result = self.run_report_command(token, id, command, notes).await;
        if let Err(err) = &result {
            log_report_event!(warn, SUBSYSTEM, "Report command rejected", id, command = command.as_str(), kind = err.kind().as_str(), error = %err);
        }
        Self::observe("report", command.as_str(), &result);
        result
    }

    async fn annotate_report(
        &self,
        token: &CapabilityToken,
        id: ReportId,
        notes: String,
    ) -> Result<Report, DispatchError> {
        let _timer = time_histogram!(DISPATCH_DURATION);
        let result = self.run_annotate(token, id, notes).await;
        if let Err(err) = &result {
            log_event_rejected("report", "annotate", err);
        }
        Self::observe("report", "annotate", &result);
        result
    }

    async fn read_report(
        &self,
        token: &CapabilityToken,
        id: ReportId,
    ) -> Result<Report, DispatchError> {
        let principal = self.authenticate(token).await?;
        Self::gate(&principal, TRIAGE_READ_ROLES, "read-report")?;
        debug!(subsystem = SUBSYSTEM, report_id = %id, "Report read");
        self.bounded("report store", self.reports.read_report(id))
            .await
    }

    async fn list_reports(
        &self,
        token: &CapabilityToken,
        status: Option<ReportStatus>,
    ) -> Result<Vec<Report>, DispatchError> {
        let principal = self.authenticate(token).await?;
        Self::gate(&principal, TRIAGE_READ_ROLES, "list-reports")?;
        self.bounded("report store", self.reports.list_reports(status))
            .await
    }

    async fn unit_queue(
        &self,
        token: &CapabilityToken,
        status: UnitStatus,
    ) -> Result<Vec<Unit>, DispatchError> {
        let principal = self.authenticate(token).await?;
        if !queue_permits(principal.role, status) {
            return Err(DispatchError::forbidden(
                principal.role,
                format!("list {}", status),
            ));
        }
        self.bounded("unit store", self.units.list_units(Some(status)))
            .await
    }

    async fn allowed_unit_commands(
        &self,
        token: &CapabilityToken,
        code: &UnitCode,
    ) -> Result<Vec<UnitCommandKind>, DispatchError> {
        let principal = self.authenticate(token).await?;
        let unit = self
            .bounded("unit store", self.units.read_unit(code))
            .await?;
        Ok(lifecycle::allowed_commands(principal.role, unit.status))
    }
}

fn log_event_rejected(entity: &str, command: &str, err: &DispatchError) {
    trace_telemetry::log_event!(
        warn,
        SUBSYSTEM,
        "Command rejected",
        entity = entity,
        command = command,
        kind = err.kind().as_str(),
        error = %err
    );
}
