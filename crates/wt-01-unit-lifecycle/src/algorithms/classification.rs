//! # Safety Classification
//!
//! Derives the public safety label from a unit's recorded history. The label
//! is computed on every read and never persisted.
//!
//! | Condition | Label |
//! |-----------|-------|
//! | No creation record | `UNRECOGNISABLE` |
//! | `REJECTED_*` | `UNSAFE` |
//! | `CREATED` / `INSPECTOR` | `UNRECOGNISABLE` |
//! | `DISTRIBUTED` / `SOLD` with a prior step missing | `SUSPICIOUS` |
//! | `APPROVED` / `DISTRIBUTED` / `SOLD`, history replays cleanly | `SAFE` |
//! | anything else | `UNKNOWN` (alarm) |
//!
//! A `DISTRIBUTED` unit is `SAFE` when its approve and distribute records are
//! both present, the same as a `SOLD` one. Being in distribution is not
//! suspicious in itself; only a missing record is.

use super::transition::replay;
use crate::domain::{Assessment, SafetyClassification, UnitHistory};
use shared_types::{UnitCommandKind, UnitStatus};

/// Records a unit in `status` must carry to be considered complete.
fn required_records(status: UnitStatus) -> &'static [UnitCommandKind] {
    match status {
        UnitStatus::Distributed => &[UnitCommandKind::Approve, UnitCommandKind::Distribute],
        UnitStatus::Sold => &[
            UnitCommandKind::Approve,
            UnitCommandKind::Distribute,
            UnitCommandKind::Sell,
        ],
        _ => &[],
    }
}

/// Classify a history, keeping the reason whenever the result is `UNKNOWN`.
pub fn assess(history: &UnitHistory) -> Assessment {
    if history.creation().is_none() {
        return Assessment::plain(SafetyClassification::Unrecognisable);
    }

    let status = history.unit.status;
    match status {
        UnitStatus::RejectedContaminated | UnitStatus::RejectedExpired => {
            return Assessment::plain(SafetyClassification::Unsafe)
        }
        UnitStatus::Created | UnitStatus::Inspector => {
            return Assessment::plain(SafetyClassification::Unrecognisable)
        }
        UnitStatus::Approved | UnitStatus::Distributed | UnitStatus::Sold => {}
    }

    if required_records(status)
        .iter()
        .any(|kind| !history.has_record(*kind))
    {
        return Assessment::plain(SafetyClassification::Suspicious);
    }

    match replay(&history.transitions) {
        Ok(replayed) if replayed == status => Assessment::plain(SafetyClassification::Safe),
        Ok(replayed) => Assessment::alarm(format!(
            "stored status {} but history replays to {}",
            status, replayed
        )),
        Err(e) => Assessment::alarm(e.to_string()),
    }
}

/// Classify a history.
pub fn classify(history: &UnitHistory) -> SafetyClassification {
    assess(history).classification
}
