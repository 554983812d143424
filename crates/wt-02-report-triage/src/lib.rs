//! # WT-02 Report Triage
//!
//! Quality and safety reports filed by anyone, triaged by admins. The triage
//! machine is independent of the unit lifecycle: resolving a report never
//! moves a unit, and approving a unit never touches a report.
//!
//! **Subsystem ID:** 2  
//! **Architecture:** Pure domain (no I/O, no clock, no locks)
//!
//! ## Status Graph
//!
//! ```text
//!            start-investigation          resolve
//! PENDING ─────────────────────► INVESTIGATING ──────► RESOLVED (T)
//!    │  ▲                              │
//!    │  │ reopen                       │ dismiss
//!    │  └──────── DISMISSED ◄──────────┘
//!    └──── dismiss ───┘
//! ```
//!
//! Notes can be attached with any transition, or appended on their own via
//! `annotate`, which bypasses the table entirely.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod domain;

// Re-exports
pub use algorithms::{
    allowed_commands, required_roles, target_status, transition, ANNOTATE_ROLES,
    REPORT_CAPABILITIES, TRIAGE_READ_ROLES,
};
pub use domain::{
    append_notes, NewReport, Report, ReportRow, TriageError, ANONYMOUS_MARKER,
    DEFAULT_MAX_REASON_LEN,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
