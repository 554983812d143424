//! # Shared Types Crate
//!
//! This crate contains every type that crosses a subsystem boundary: the
//! principal model, unit and report identifiers, both status vocabularies,
//! the command set and the transition records handed to the ledger.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Status enums and commands are defined once
//!   here; the state machines in `wt-01`/`wt-02` only decide legality.
//! - **Closed Vocabularies**: Every enum serializes as `SCREAMING_SNAKE_CASE`
//!   and deserialization rejects unknown values.
//! - **Presence Matters**: Optional fields (`rejectionReason`, `adminNotes`)
//!   are omitted when absent, never serialized as empty strings.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
