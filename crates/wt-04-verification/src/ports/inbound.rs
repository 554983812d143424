//! # Inbound Ports
//!
//! API trait defining what the verification service can do.

use crate::domain::{UnitView, VerificationError};
use async_trait::async_trait;

/// Verification API - inbound port.
///
/// Callable by anyone; takes no credential.
#[async_trait]
pub trait VerificationApi: Send + Sync {
    /// Look up a unit by its code as typed by the caller.
    async fn verify(&self, code: &str) -> Result<UnitView, VerificationError>;
}
