//! # Domain Errors
//!
//! Error types for the unit lifecycle.

use shared_types::{ErrorKind, UnitCode, UnitCommandKind, UnitStatus};
use thiserror::Error;

/// Unit lifecycle error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// No table row permits the command from the current status.
    #[error("Illegal transition: {command} from {from}")]
    IllegalTransition {
        /// Current status
        from: UnitStatus,
        /// Attempted command
        command: UnitCommandKind,
    },

    /// Creation payload rejected.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Replayed history does not start with a creation record.
    #[error("History of {0} has no creation record")]
    MissingCreation(UnitCode),

    /// Replayed history contains a step the machine would not have accepted.
    #[error("History mismatch at step {step}: {detail}")]
    HistoryMismatch {
        /// Zero-based index of the offending record
        step: usize,
        /// What did not line up
        detail: String,
    },
}

impl LifecycleError {
    /// Map onto the shared error taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IllegalTransition { .. } => ErrorKind::IllegalTransition,
            Self::InvalidPayload(_) => ErrorKind::InvalidPayload,
            // A broken stored history is an internal fault, not a caller error.
            Self::MissingCreation(_) | Self::HistoryMismatch { .. } => ErrorKind::Unavailable,
        }
    }
}
