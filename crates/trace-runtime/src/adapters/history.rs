//! History Adapter
//!
//! Lets verification (wt-04) read unit histories from the dispatcher's
//! unit store (wt-03) without either crate depending on the other.

use async_trait::async_trait;
use shared_types::UnitCode;
use std::sync::Arc;
use wt_01_unit_lifecycle::UnitHistory;
use wt_03_command_dispatch::{StoreError, UnitStore};
use wt_04_verification::{HistoryReader, LookupError};

/// Read-only view of a `UnitStore` as a `HistoryReader`.
pub struct StoreHistoryReader<U: UnitStore> {
    store: Arc<U>,
}

impl<U: UnitStore> StoreHistoryReader<U> {
    /// Wrap a unit store.
    pub fn new(store: Arc<U>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<U: UnitStore> HistoryReader for StoreHistoryReader<U> {
    async fn unit_history(&self, code: &UnitCode) -> Result<UnitHistory, LookupError> {
        self.store.unit_history(code).await.map_err(|e| match e {
            StoreError::NotFound(key) => LookupError::Missing(key),
            StoreError::Conflict(msg)
            | StoreError::AlreadyExists(msg)
            | StoreError::Unavailable(msg) => LookupError::Unavailable(msg),
        })
    }
}
