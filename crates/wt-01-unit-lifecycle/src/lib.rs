//! # WT-01 Unit Lifecycle
//!
//! The canonical status graph for a traceable water unit (or a batch of
//! identical packs sharing one code).
//!
//! **Subsystem ID:** 1  
//! **Architecture:** Pure domain (no I/O, no clock, no locks)
//!
//! ## Purpose
//!
//! - Sole authority on which unit transitions are legal, and for which roles
//! - Replays recorded histories for audit
//! - Derives the public safety classification from a history
//!
//! ## Status Graph
//!
//! ```text
//! CREATED ──► INSPECTOR ──► APPROVED ──► DISTRIBUTED ──► SOLD (T)
//!                 │
//!                 ├──► REJECTED_CONTAMINATED (T)
//!                 └──► REJECTED_EXPIRED (T)
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! wt-01-unit-lifecycle/
//! ├── domain/          # Unit, NewUnit, UnitHistory, SafetyClassification, errors
//! └── algorithms/      # Capability table, transition, replay, classification
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod domain;

// Re-exports
pub use algorithms::{
    allowed_commands, assess, classify, ensure_legal, replay, required_roles, target_status, transition,
    CREATE_UNIT_ROLES, UNIT_CAPABILITIES,
};
pub use domain::{
    invariant_history_belongs_to, invariant_immutable_fields, invariant_strictly_increasing,
    Assessment, LifecycleError, NewUnit, SafetyClassification, Unit, UnitHistory, UnitRow,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
