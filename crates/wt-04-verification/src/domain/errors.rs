//! # Domain Errors

use shared_types::ErrorKind;
use thiserror::Error;

/// Failure reported by the history collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No unit under this code.
    #[error("no history for {0}")]
    Missing(String),

    /// Backing store timed out or is down.
    #[error("history unavailable: {0}")]
    Unavailable(String),
}

/// Why a verification returned no view.
///
/// `NotFound` carries nothing: an unknown code, a malformed code and a
/// withheld code all produce the same value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// Unknown, malformed or withheld code.
    #[error("not found")]
    NotFound,

    /// History could not be read in time. Safe to retry.
    #[error("verification unavailable: {0}")]
    Unavailable(String),
}

impl VerificationError {
    /// Map onto the shared error taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound => ErrorKind::NotFound,
            Self::Unavailable(_) => ErrorKind::Unavailable,
        }
    }
}

impl From<LookupError> for VerificationError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::Missing(_) => Self::NotFound,
            LookupError::Unavailable(msg) => Self::Unavailable(msg),
        }
    }
}
