//! # Triage Transitions
//!
//! `(current status, command) -> next status` for reports. Every command is
//! admin-only. `RESOLVED` has no outgoing row; `DISMISSED` can be reopened.

use crate::domain::{ReportRow, TriageError};
use shared_types::{ReportCommand, ReportStatus, Role};

/// Roles allowed to append notes outside a transition.
pub const ANNOTATE_ROLES: &[Role] = &[Role::Admin];

/// Roles allowed to list and read reports.
pub const TRIAGE_READ_ROLES: &[Role] = &[Role::Admin];

/// Every legal report transition. Anything not listed is illegal.
pub const REPORT_CAPABILITIES: &[ReportRow] = &[
    ReportRow {
        from: ReportStatus::Pending,
        command: ReportCommand::StartInvestigation,
        roles: &[Role::Admin],
    },
    ReportRow {
        from: ReportStatus::Pending,
        command: ReportCommand::Dismiss,
        roles: &[Role::Admin],
    },
    ReportRow {
        from: ReportStatus::Investigating,
        command: ReportCommand::Resolve,
        roles: &[Role::Admin],
    },
    ReportRow {
        from: ReportStatus::Investigating,
        command: ReportCommand::Dismiss,
        roles: &[Role::Admin],
    },
    ReportRow {
        from: ReportStatus::Dismissed,
        command: ReportCommand::Reopen,
        roles: &[Role::Admin],
    },
];

/// Status a triage command leads to.
pub fn target_status(command: ReportCommand) -> ReportStatus {
    match command {
        ReportCommand::StartInvestigation => ReportStatus::Investigating,
        ReportCommand::Dismiss => ReportStatus::Dismissed,
        ReportCommand::Resolve => ReportStatus::Resolved,
        ReportCommand::Reopen => ReportStatus::Pending,
    }
}

/// Compute the next status, or `IllegalTransition` if no row permits it.
pub fn transition(from: ReportStatus, command: ReportCommand) -> Result<ReportStatus, TriageError> {
    if REPORT_CAPABILITIES
        .iter()
        .any(|row| row.from == from && row.command == command)
    {
        Ok(target_status(command))
    } else {
        Err(TriageError::IllegalTransition { from, command })
    }
}

/// Roles allowed to issue a command, from any status.
pub fn required_roles(command: ReportCommand) -> &'static [Role] {
    REPORT_CAPABILITIES
        .iter()
        .find(|row| row.command == command)
        .map(|row| row.roles)
        .unwrap_or(&[])
}

/// Commands currently legal for `role` on a report in `status`.
pub fn allowed_commands(role: Role, status: ReportStatus) -> Vec<ReportCommand> {
    REPORT_CAPABILITIES
        .iter()
        .filter(|row| row.from == status && row.permits(role))
        .map(|row| row.command)
        .collect()
}
