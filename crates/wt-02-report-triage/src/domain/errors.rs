//! # Domain Errors
//!
//! Error types for report triage.

use shared_types::{ErrorKind, ReportCommand, ReportStatus};
use thiserror::Error;

/// Report triage error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriageError {
    /// No table row permits the command from the current status.
    #[error("Illegal transition: {command} from {from}")]
    IllegalTransition {
        /// Current status
        from: ReportStatus,
        /// Attempted command
        command: ReportCommand,
    },

    /// Submission or notes payload rejected.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

impl TriageError {
    /// Map onto the shared error taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IllegalTransition { .. } => ErrorKind::IllegalTransition,
            Self::InvalidPayload(_) => ErrorKind::InvalidPayload,
        }
    }
}
