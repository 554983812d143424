//! # Domain Value Objects
//!
//! Immutable value types for the unit lifecycle.

use serde::{Deserialize, Serialize};
use shared_types::{Capability, UnitCommandKind, UnitStatus};
use std::fmt;

/// One row of the unit capability table.
pub type UnitRow = Capability<UnitStatus, UnitCommandKind>;

/// Derived, never persisted, safety label for a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SafetyClassification {
    /// Inspected, approved and every downstream step recorded.
    Safe,
    /// Rejected at inspection.
    Unsafe,
    /// Marked distributed or sold with a prior step missing from the record.
    Suspicious,
    /// No creation record, or no inspection outcome yet.
    Unrecognisable,
    /// Matched no rule. Never expected for a well-formed history.
    Unknown,
}

impl SafetyClassification {
    /// Wire name of the label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "SAFE",
            Self::Unsafe => "UNSAFE",
            Self::Suspicious => "SUSPICIOUS",
            Self::Unrecognisable => "UNRECOGNISABLE",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Whether this label signals an internal-consistency alarm.
    pub fn is_alarm(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for SafetyClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification together with the reason an alarm was raised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assessment {
    /// The derived label.
    pub classification: SafetyClassification,
    /// Set only when the label is `UNKNOWN`.
    pub anomaly: Option<String>,
}

impl Assessment {
    /// A label that needs no explanation.
    pub fn plain(classification: SafetyClassification) -> Self {
        Self {
            classification,
            anomaly: None,
        }
    }

    /// An `UNKNOWN` label with the reason it was reached.
    pub fn alarm(detail: impl Into<String>) -> Self {
        Self {
            classification: SafetyClassification::Unknown,
            anomaly: Some(detail.into()),
        }
    }
}
