//! # Domain Errors
//!
//! Errors raised by the dispatcher and by its collaborators.

use shared_types::{ErrorKind, Role};
use thiserror::Error;
use wt_01_unit_lifecycle::LifecycleError;
use wt_02_report_triage::TriageError;

/// Failure reported by the credential collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// Token was never issued.
    #[error("unknown token")]
    Unknown,

    /// Token is past its expiry.
    #[error("token expired at {expired_at}")]
    Expired {
        /// Expiry time (ms since epoch)
        expired_at: u64,
    },

    /// Token was revoked.
    #[error("token revoked")]
    Revoked,

    /// Credential service could not be reached.
    #[error("credential service unavailable: {0}")]
    Unavailable(String),
}

/// Failure reported by an entity store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No entity under this key.
    #[error("not found: {0}")]
    NotFound(String),

    /// Compare-and-set lost.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Insert under a key that is already taken.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Store timed out or is down.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Failure reported by the ledger sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Record could not be serialized for hashing.
    #[error("record encoding failed: {0}")]
    Encoding(String),

    /// Ledger did not acknowledge the append.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}

/// Every way a command can fail. Callers branch on [`DispatchError::kind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Missing, unknown, expired or revoked credential.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Valid credential, wrong role.
    #[error("Forbidden: {role} may not {command}")]
    Forbidden {
        /// Role asserted by the credential
        role: Role,
        /// Attempted command
        command: String,
    },

    /// Role is right, the state machine says no.
    #[error("Illegal transition: {command} from {from}")]
    IllegalTransition {
        /// Current status
        from: String,
        /// Attempted command
        command: String,
    },

    /// Payload malformed or missing required fields.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Unknown unit code or report id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Lost a race on the entity store.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Collaborator timed out or failed.
    #[error("Unavailable: {0}")]
    Unavailable(String),
}

impl DispatchError {
    /// Map onto the shared error taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthenticated(_) => ErrorKind::Unauthenticated,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::IllegalTransition { .. } => ErrorKind::IllegalTransition,
            Self::InvalidPayload(_) => ErrorKind::InvalidPayload,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Unavailable(_) => ErrorKind::Unavailable,
        }
    }

    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    pub(crate) fn forbidden(role: Role, command: impl Into<String>) -> Self {
        Self::Forbidden {
            role,
            command: command.into(),
        }
    }
}

impl From<CredentialError> for DispatchError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Unavailable(msg) => Self::Unavailable(msg),
            other => Self::Unauthenticated(other.to_string()),
        }
    }
}

impl From<StoreError> for DispatchError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(key) => Self::NotFound(key),
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::AlreadyExists(key) => {
                Self::InvalidPayload(format!("{} is already registered", key))
            }
            StoreError::Unavailable(msg) => Self::Unavailable(msg),
        }
    }
}

impl From<LedgerError> for DispatchError {
    fn from(err: LedgerError) -> Self {
        Self::Unavailable(err.to_string())
    }
}

impl From<LifecycleError> for DispatchError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::IllegalTransition { from, command } => Self::IllegalTransition {
                from: from.to_string(),
                command: command.to_string(),
            },
            LifecycleError::InvalidPayload(msg) => Self::InvalidPayload(msg),
            other => Self::Unavailable(other.to_string()),
        }
    }
}

impl From<TriageError> for DispatchError {
    fn from(err: TriageError) -> Self {
        match err {
            TriageError::IllegalTransition { from, command } => Self::IllegalTransition {
                from: from.to_string(),
                command: command.to_string(),
            },
            TriageError::InvalidPayload(msg) => Self::InvalidPayload(msg),
        }
    }
}
