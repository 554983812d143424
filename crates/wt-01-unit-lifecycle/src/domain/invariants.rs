//! # Domain Invariants
//!
//! Provenance rules every accepted unit transition must preserve.

use super::entities::Unit;
use super::errors::LifecycleError;
use shared_types::{UnitCode, UnitTransition};

/// Invariant: identity fields never change across a transition.
///
/// `code`, `unit_type`, `quantity`, `created_by` and `created_at` are fixed at
/// creation.
pub fn invariant_immutable_fields(before: &Unit, after: &Unit) -> bool {
    before.code == after.code
        && before.unit_type == after.unit_type
        && before.quantity == after.quantity
        && before.created_by == after.created_by
        && before.created_at == after.created_at
}

/// Invariant: `last_modified_at` strictly increases on every accepted transition.
pub fn invariant_strictly_increasing(before: &Unit, after: &Unit) -> bool {
    after.last_modified_at > before.last_modified_at
}

/// Invariant: every record in a history targets the same unit.
pub fn invariant_history_belongs_to(
    code: &UnitCode,
    transitions: &[UnitTransition],
) -> Result<(), LifecycleError> {
    match transitions.iter().position(|t| &t.code != code) {
        Some(step) => Err(LifecycleError::HistoryMismatch {
            step,
            detail: format!(
                "record targets {} instead of {}",
                transitions[step].code, code
            ),
        }),
        None => Ok(()),
    }
}
