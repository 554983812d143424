//! # Error Types
//!
//! Defines the error vocabulary shared across subsystems.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable error category returned by every core operation.
///
/// Callers branch on the kind, never on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Credential missing, unknown, expired or revoked.
    Unauthenticated,
    /// Role not permitted for the command.
    Forbidden,
    /// Command not legal from the current state.
    IllegalTransition,
    /// Payload malformed or missing required fields.
    InvalidPayload,
    /// Entity does not exist (or is not disclosed).
    NotFound,
    /// Concurrent modification or duplicate identity.
    Conflict,
    /// A collaborator timed out or failed.
    Unavailable,
}

impl ErrorKind {
    /// Only `Conflict` and `Unavailable` are worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict | Self::Unavailable)
    }

    /// Wire name of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
            Self::IllegalTransition => "ILLEGAL_TRANSITION",
            Self::InvalidPayload => "INVALID_PAYLOAD",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::Unavailable => "UNAVAILABLE",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a string is not a valid unit code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidUnitCode {
    /// Blank after trimming.
    #[error("unit code is empty")]
    Empty,

    /// Longer than the allowed maximum.
    #[error("unit code too long: {len} > {max}")]
    TooLong { len: usize, max: usize },

    /// Contains whitespace, control or non-ASCII characters.
    #[error("unit code contains illegal characters")]
    IllegalCharacter,
}

/// A rejection reason outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown rejection reason: {0:?}")]
pub struct UnknownRejectionReason(pub String);
