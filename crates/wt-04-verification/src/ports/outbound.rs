//! # Outbound Ports
//!
//! Dependencies the verification service needs from other subsystems.

use crate::domain::LookupError;
use async_trait::async_trait;
use shared_types::UnitCode;
use wt_01_unit_lifecycle::UnitHistory;

/// Read access to persisted unit histories - outbound port.
///
/// Must return the unit and its records from one consistent snapshot.
#[async_trait]
pub trait HistoryReader: Send + Sync {
    /// Unit and every transition recorded for it, oldest first.
    async fn unit_history(&self, code: &UnitCode) -> Result<UnitHistory, LookupError>;
}

/// Decides which codes may not be disclosed publicly - outbound port.
pub trait DisclosurePolicy: Send + Sync {
    /// Whether lookups for `code` must answer `NotFound`.
    fn is_withheld(&self, code: &UnitCode) -> bool;
}
