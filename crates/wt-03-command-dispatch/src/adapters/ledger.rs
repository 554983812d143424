//! Ledger Adapter
//!
//! Implements `LedgerSink` as an append-only, hash-chained log:
//! `entry_hash = SHA-256(prev_hash || canonical JSON of the record)`.
//! Consensus and block production are out of scope; this is the audit
//! trail a real ledger would be fed.

use crate::domain::{LedgerError, LedgerReceipt};
use crate::ports::outbound::LedgerSink;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::TransitionRecord;
use tracing::{debug, warn};

/// Hash that precedes the first entry.
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// One appended record with its chain links.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    /// Position, starting at 0.
    pub sequence: u64,
    /// Hash of the previous entry, or [`GENESIS_HASH`].
    pub prev_hash: String,
    /// Hash of this entry.
    pub entry_hash: String,
    /// The appended record.
    pub record: TransitionRecord,
}

fn chain_hash(prev_hash: &str, record: &TransitionRecord) -> Result<String, LedgerError> {
    let canonical = serde_json::to_vec(record).map_err(|e| LedgerError::Encoding(e.to_string()))?;
    let mut hasher = Sha256::new();
    hasher.update(prev_hash.as_bytes());
    hasher.update(&canonical);
    Ok(hex::encode(hasher.finalize()))
}

/// In-memory hash-chained ledger.
pub struct InMemoryLedger {
    entries: RwLock<Vec<LedgerEntry>>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Snapshot of every entry.
    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.entries.read().clone()
    }

    /// Entries whose record targets `key` (unit code or report id).
    pub fn entries_for(&self, key: &str) -> Vec<LedgerEntry> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.record.entity_key() == key)
            .cloned()
            .collect()
    }

    /// Hash of the latest entry, or [`GENESIS_HASH`].
    pub fn head(&self) -> String {
        self.entries
            .read()
            .last()
            .map(|e| e.entry_hash.clone())
            .unwrap_or_else(|| GENESIS_HASH.to_string())
    }

    /// Recompute the chain. Returns the sequence of the first broken entry.
    pub fn verify_chain(&self) -> Result<(), u64> {
        let entries = self.entries.read();
        let mut prev = GENESIS_HASH.to_string();
        for entry in entries.iter() {
            let expected = chain_hash(&prev, &entry.record).map_err(|_| entry.sequence)?;
            if entry.prev_hash != prev || entry.entry_hash != expected {
                warn!(sequence = entry.sequence, "Ledger chain broken");
                return Err(entry.sequence);
            }
            prev = expected;
        }
        Ok(())
    }

    #[cfg(test)]
    fn tamper(&self, sequence: usize, record: TransitionRecord) {
        self.entries.write()[sequence].record = record;
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerSink for InMemoryLedger {
    async fn append(&self, record: &TransitionRecord) -> Result<LedgerReceipt, LedgerError> {
        let mut entries = self.entries.write();
        let prev_hash = entries
            .last()
            .map(|e| e.entry_hash.clone())
            .unwrap_or_else(|| GENESIS_HASH.to_string());
        let entry_hash = chain_hash(&prev_hash, record)?;
        let sequence = entries.len() as u64;

        entries.push(LedgerEntry {
            sequence,
            prev_hash,
            entry_hash: entry_hash.clone(),
            record: record.clone(),
        });
        debug!(sequence, entity = %record.entity_key(), "Ledger entry appended");

        Ok(LedgerReceipt {
            sequence,
            entry_hash,
        })
    }
}
