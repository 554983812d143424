//! # WT-04 Verification
//!
//! Public lookups: any caller, with or without a credential, can ask what
//! happened to a unit and whether it is safe.
//!
//! **Subsystem ID:** 4
//! **Architecture:** Hexagonal (ports and adapters), read-only
//!
//! ## Flow
//!
//! ```text
//! code ──► parse ──► DisclosurePolicy ──► HistoryReader ──► assess (wt-01) ──► UnitView
//!            │              │                   │                 │
//!            └──── NotFound ┴──── NotFound ─────┘                 └── UNKNOWN ──► alarm
//! ```
//!
//! ## Disclosure
//!
//! Malformed, unknown and withheld codes all yield the same
//! `VerificationError::NotFound`, with no payload, so a lookup cannot be
//! used as an existence oracle.
//!
//! ## Module Structure
//!
//! ```text
//! wt-04-verification/
//! ├── domain/          # UnitView, HistoryEntry, errors
//! ├── ports/           # VerificationApi (inbound), HistoryReader/DisclosurePolicy (outbound)
//! ├── adapters/        # WithheldCodes
//! └── service.rs       # VerificationService
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::WithheldCodes;
pub use domain::{HistoryEntry, LookupError, UnitView, VerificationError};
pub use ports::{DisclosurePolicy, HistoryReader, VerificationApi};
pub use service::{VerificationConfig, VerificationService};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
