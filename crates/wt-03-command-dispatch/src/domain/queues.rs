//! # Role Queues
//!
//! Which unit statuses each role works from. Mirrors the per-role dashboards:
//! inspectors see what awaits inspection, distributors see stock to move.

use shared_types::{Role, UnitStatus};

/// Statuses whose units `role` may list. Admins see every status.
pub fn queue_statuses(role: Role) -> &'static [UnitStatus] {
    match role {
        Role::Producer => &[UnitStatus::Created],
        Role::Inspector => &[UnitStatus::Created, UnitStatus::Inspector],
        Role::Distributor => &[UnitStatus::Approved, UnitStatus::Distributed],
        Role::Admin => &UnitStatus::ALL,
    }
}

/// Whether `role` may list units in `status`.
pub fn queue_permits(role: Role, status: UnitStatus) -> bool {
    queue_statuses(role).contains(&status)
}
