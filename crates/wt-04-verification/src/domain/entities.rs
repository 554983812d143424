//! # Domain Entities
//!
//! What an anonymous caller gets back from a lookup. Built only from the
//! stored history; never carries credentials or the creating principal.

use serde::{Deserialize, Serialize};
use shared_types::{
    PrincipalId, RejectionReason, Role, Timestamp, UnitAction, UnitCode, UnitStatus,
    UnitTransition, UnitType,
};
use wt_01_unit_lifecycle::{SafetyClassification, UnitHistory};

/// One recorded step in a unit's public history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Previous state; absent for the creation step.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub from: Option<UnitStatus>,
    /// New state.
    pub to: UnitStatus,
    /// Command or creation payload.
    pub action: UnitAction,
    /// Role the actor held.
    pub role: Role,
    /// Acting principal.
    pub actor: PrincipalId,
    /// When the step was accepted.
    pub at: Timestamp,
}

impl From<&UnitTransition> for HistoryEntry {
    fn from(t: &UnitTransition) -> Self {
        Self {
            from: t.from,
            to: t.to,
            action: t.action.clone(),
            role: t.role,
            actor: t.actor.clone(),
            at: t.at,
        }
    }
}

/// Read-only projection of a unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitView {
    /// Unit code.
    pub code: UnitCode,
    /// Packaging type.
    pub unit_type: UnitType,
    /// Number of packs.
    pub quantity: u32,
    /// Current status.
    pub status: UnitStatus,
    /// Derived safety label.
    pub classification: SafetyClassification,
    /// Present only for rejected units.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rejection_reason: Option<RejectionReason>,
    /// Creation time.
    pub created_at: Timestamp,
    /// Time of the last accepted transition.
    pub last_modified_at: Timestamp,
    /// Recorded steps, oldest first.
    pub history: Vec<HistoryEntry>,
}

impl UnitView {
    /// Project a history with its computed label.
    pub fn project(history: &UnitHistory, classification: SafetyClassification) -> Self {
        let unit = &history.unit;
        Self {
            code: unit.code.clone(),
            unit_type: unit.unit_type,
            quantity: unit.quantity,
            status: unit.status,
            classification,
            rejection_reason: unit.rejection_reason,
            created_at: unit.created_at,
            last_modified_at: unit.last_modified_at,
            history: history.transitions.iter().map(HistoryEntry::from).collect(),
        }
    }
}
