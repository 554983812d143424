//! # Adapters Module
//!
//! In-memory implementations of the outbound ports, for single-node use and
//! tests. Production deployments plug in their own store, ledger and
//! credential service behind the same traits.

pub mod clock;
pub mod credentials;
pub mod ledger;
pub mod memory_store;

pub use clock::{ManualClock, SystemClock};
pub use credentials::StaticCredentialResolver;
pub use ledger::{InMemoryLedger, LedgerEntry, GENESIS_HASH};
pub use memory_store::InMemoryEntityStore;
