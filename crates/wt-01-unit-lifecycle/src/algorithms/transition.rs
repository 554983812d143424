//! # Unit Transitions
//!
//! `(current status, command) -> next status`, driven by a declarative table.
//! No hidden context: the same inputs always give the same answer, so
//! recorded histories can be replayed for audit.

use crate::domain::{invariant_history_belongs_to, LifecycleError, UnitRow};
use shared_types::{Role, UnitCommand, UnitCommandKind, UnitStatus, UnitTransition};

/// Roles allowed to register a unit.
pub const CREATE_UNIT_ROLES: &[Role] = &[Role::Producer];

/// Every legal unit transition. Anything not listed is illegal.
pub const UNIT_CAPABILITIES: &[UnitRow] = &[
    UnitRow {
        from: UnitStatus::Created,
        command: UnitCommandKind::SubmitForInspection,
        roles: &[Role::Producer, Role::Inspector],
    },
    UnitRow {
        from: UnitStatus::Inspector,
        command: UnitCommandKind::Approve,
        roles: &[Role::Inspector],
    },
    UnitRow {
        from: UnitStatus::Inspector,
        command: UnitCommandKind::Reject,
        roles: &[Role::Inspector],
    },
    UnitRow {
        from: UnitStatus::Approved,
        command: UnitCommandKind::Distribute,
        roles: &[Role::Distributor],
    },
    UnitRow {
        from: UnitStatus::Distributed,
        command: UnitCommandKind::Sell,
        roles: &[Role::Distributor],
    },
];

/// Status a command leads to, independent of where it is issued from.
pub fn target_status(command: &UnitCommand) -> UnitStatus {
    match command {
        UnitCommand::SubmitForInspection => UnitStatus::Inspector,
        UnitCommand::Approve => UnitStatus::Approved,
        UnitCommand::Reject { reason } => reason.rejected_status(),
        UnitCommand::Distribute => UnitStatus::Distributed,
        UnitCommand::Sell => UnitStatus::Sold,
    }
}

/// `IllegalTransition` unless some row lets `command` leave `from`.
///
/// Needs only the command kind, so callers can check the table before
/// they have parsed the payload.
pub fn ensure_legal(from: UnitStatus, command: UnitCommandKind) -> Result<(), LifecycleError> {
    if UNIT_CAPABILITIES
        .iter()
        .any(|row| row.from == from && row.command == command)
    {
        Ok(())
    } else {
        Err(LifecycleError::IllegalTransition { from, command })
    }
}

/// Compute the next status, or `IllegalTransition` if no row permits it.
pub fn transition(from: UnitStatus, command: &UnitCommand) -> Result<UnitStatus, LifecycleError> {
    ensure_legal(from, command.kind())?;
    Ok(target_status(command))
}

/// Roles allowed to issue a command, from any status.
pub fn required_roles(command: UnitCommandKind) -> &'static [Role] {
    UNIT_CAPABILITIES
        .iter()
        .find(|row| row.command == command)
        .map(|row| row.roles)
        .unwrap_or(&[])
}

/// Commands currently legal for `role` on a unit in `status`.
pub fn allowed_commands(role: Role, status: UnitStatus) -> Vec<UnitCommandKind> {
    UNIT_CAPABILITIES
        .iter()
        .filter(|row| row.from == status && row.permits(role))
        .map(|row| row.command)
        .collect()
}

/// Re-run the machine over a recorded history and return the final status.
///
/// The first record must be the creation; each later record must start where
/// the previous one ended, be legal for the recorded role, land on the status
/// the table dictates and be strictly later in time.
pub fn replay(transitions: &[UnitTransition]) -> Result<UnitStatus, LifecycleError> {
    let first = transitions.first().ok_or_else(|| LifecycleError::HistoryMismatch {
        step: 0,
        detail: "history is empty".to_string(),
    })?;
    if !first.is_creation() || first.to != UnitStatus::Created {
        return Err(LifecycleError::MissingCreation(first.code.clone()));
    }
    if !CREATE_UNIT_ROLES.contains(&first.role) {
        return Err(LifecycleError::HistoryMismatch {
            step: 0,
            detail: format!("unit created by {}", first.role),
        });
    }
    invariant_history_belongs_to(&first.code, transitions)?;

    let mut status = first.to;
    let mut last_at = first.at;
    for (step, record) in transitions.iter().enumerate().skip(1) {
        let mismatch = |detail: String| LifecycleError::HistoryMismatch { step, detail };

        let command = record
            .action
            .command()
            .ok_or_else(|| mismatch("second creation record".to_string()))?;
        if record.from != Some(status) {
            return Err(mismatch(format!(
                "record starts from {:?}, unit was {}",
                record.from, status
            )));
        }
        let next = transition(status, command).map_err(|e| mismatch(e.to_string()))?;
        if next != record.to {
            return Err(mismatch(format!("record lands on {}, table gives {}", record.to, next)));
        }
        if !required_roles(command.kind()).contains(&record.role) {
            return Err(mismatch(format!("{} issued by {}", command.kind(), record.role)));
        }
        if record.at <= last_at {
            return Err(mismatch("timestamp did not increase".to_string()));
        }
        status = next;
        last_at = record.at;
    }
    Ok(status)
}
