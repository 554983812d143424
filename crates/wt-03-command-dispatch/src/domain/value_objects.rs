//! # Domain Value Objects
//!
//! Results handed back to callers of the dispatcher.

use serde::{Deserialize, Serialize};

/// Acknowledgement from the ledger sink.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerReceipt {
    /// Position in the ledger, starting at 0.
    pub sequence: u64,
    /// Hex-encoded hash of the entry.
    pub entry_hash: String,
}

/// An accepted command: the new persisted state plus the ledger receipt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dispatched<T> {
    /// State after the transition.
    pub state: T,
    /// Ledger acknowledgement for the transition record.
    pub receipt: LedgerReceipt,
}
