//! # WT-03 Command Dispatch
//!
//! Role-gated entry point for every write against units and reports.
//!
//! **Subsystem ID:** 3
//! **Architecture:** Hexagonal (ports and adapters)
//!
//! ## Pipeline
//!
//! ```text
//! token ──► CredentialResolver ──► role gate ──► UnitStore/ReportStore read
//!                                                      │
//!                            state machine (wt-01 / wt-02) + payload checks
//!                                                      │
//!                     compare-and-set commit ──► LedgerSink ──► Event Bus
//! ```
//!
//! | Step | Failure |
//! |------|---------|
//! | credential | `Unauthenticated` |
//! | role gate | `Forbidden` |
//! | read | `NotFound` |
//! | state table | `IllegalTransition` |
//! | payload | `InvalidPayload` |
//! | commit | `Conflict` / `Unavailable`, `InvalidPayload` for a taken code |
//! | ledger | `Unavailable`, after the state is committed and published |
//!
//! ## Concurrency
//!
//! Two writers racing on one unit both read the same status; the store's
//! compare-and-set lets exactly one commit. The loser re-reads once and gets
//! `IllegalTransition` if its command no longer applies, `Conflict` otherwise.
//! Commit and ledger append share one lane, so the ledger lists records in
//! commit order.
//! Every collaborator call is bounded by `DispatchConfig::collaborator_timeout`.
//!
//! ## Module Structure
//!
//! ```text
//! wt-03-command-dispatch/
//! ├── domain/          # DispatchError, collaborator errors, receipts, role queues
//! ├── ports/           # CommandApi (inbound), stores/ledger/credentials/clock (outbound)
//! ├── adapters/        # In-memory store, hash-chained ledger, token table, clocks
//! └── service.rs       # CommandDispatcher
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use wt_03_command_dispatch::{CommandApi, CommandDispatcher, DispatchConfig};
//!
//! let dispatcher = CommandDispatcher::new(
//!     DispatchConfig::default(),
//!     credentials,
//!     store.clone(),
//!     store,
//!     ledger,
//!     clock,
//!     bus,
//! );
//! let approved = dispatcher.dispatch_unit(&token, &code, UnitCommand::Approve).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{
    InMemoryEntityStore, InMemoryLedger, LedgerEntry, ManualClock, StaticCredentialResolver,
    SystemClock, GENESIS_HASH,
};
pub use domain::{
    queue_permits, queue_statuses, CredentialError, DispatchError, Dispatched, LedgerError,
    LedgerReceipt, StoreError,
};
pub use ports::{Clock, CommandApi, CredentialResolver, LedgerSink, ReportStore, UnitStore};
pub use service::{CommandDispatcher, DispatchConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
