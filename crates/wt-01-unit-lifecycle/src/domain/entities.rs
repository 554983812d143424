//! # Domain Entities
//!
//! The unit aggregate and its recorded history.

use super::errors::LifecycleError;
use crate::algorithms::transition;
use serde::{Deserialize, Serialize};
use shared_types::{
    Principal, PrincipalId, RejectionReason, Timestamp, UnitAction, UnitCode, UnitCommand,
    UnitCommandKind, UnitStatus, UnitTransition, UnitType,
};

/// A traceable water pack, or a batch of identical packs sharing one code.
///
/// `code`, `unit_type`, `quantity`, `created_by` and `created_at` never change
/// after creation. Units are never deleted, only transitioned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    /// Globally unique code.
    pub code: UnitCode,
    /// Packaging type.
    pub unit_type: UnitType,
    /// Number of packs, always positive.
    pub quantity: u32,
    /// Current lifecycle state.
    pub status: UnitStatus,
    /// Present only in a `REJECTED_*` state.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rejection_reason: Option<RejectionReason>,
    /// Producer that registered the unit.
    pub created_by: PrincipalId,
    /// Creation time.
    pub created_at: Timestamp,
    /// Time of the last accepted transition.
    pub last_modified_at: Timestamp,
}

/// Payload of the `create-unit` command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUnit {
    /// Caller-chosen code; generated when absent.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub code: Option<String>,
    /// Packaging type.
    pub unit_type: UnitType,
    /// Number of packs.
    pub quantity: u32,
}

impl NewUnit {
    /// Create a payload with a caller-chosen code.
    pub fn with_code(code: impl Into<String>, unit_type: UnitType, quantity: u32) -> Self {
        Self {
            code: Some(code.into()),
            unit_type,
            quantity,
        }
    }

    /// Validate the payload and resolve the code.
    pub fn validate(&self) -> Result<UnitCode, LifecycleError> {
        if self.quantity == 0 {
            return Err(LifecycleError::InvalidPayload(
                "quantity must be positive".to_string(),
            ));
        }
        match self.code.as_deref() {
            Some(raw) if !raw.trim().is_empty() => UnitCode::parse(raw)
                .map_err(|e| LifecycleError::InvalidPayload(e.to_string())),
            _ => Ok(UnitCode::generate()),
        }
    }
}

impl Unit {
    /// Register a new unit. Returns the unit and its creation record.
    ///
    /// Role gating is the dispatcher's job; this only validates the payload.
    pub fn create(
        new: &NewUnit,
        creator: &Principal,
        at: Timestamp,
    ) -> Result<(Unit, UnitTransition), LifecycleError> {
        let code = new.validate()?;
        let unit = Unit {
            code: code.clone(),
            unit_type: new.unit_type,
            quantity: new.quantity,
            status: UnitStatus::Created,
            rejection_reason: None,
            created_by: creator.id.clone(),
            created_at: at,
            last_modified_at: at,
        };
        let record = UnitTransition {
            code,
            from: None,
            to: UnitStatus::Created,
            action: UnitAction::Created {
                unit_type: new.unit_type,
                quantity: new.quantity,
            },
            actor: creator.id.clone(),
            role: creator.role,
            at,
        };
        Ok((unit, record))
    }

    /// Apply a command, producing the successor unit and the transition record.
    ///
    /// `self` is left untouched so the caller can compare-and-set against it.
    /// `last_modified_at` is forced strictly past its previous value even if
    /// the clock went backwards.
    pub fn apply(
        &self,
        command: &UnitCommand,
        actor: &Principal,
        now: Timestamp,
    ) -> Result<(Unit, UnitTransition), LifecycleError> {
        let next = transition(self.status, command)?;
        let at = now.max(self.last_modified_at.saturating_add(1));

        let mut unit = self.clone();
        unit.status = next;
        unit.rejection_reason = next.rejection_reason();
        unit.last_modified_at = at;

        let record = UnitTransition {
            code: self.code.clone(),
            from: Some(self.status),
            to: next,
            action: UnitAction::Command(*command),
            actor: actor.id.clone(),
            role: actor.role,
            at,
        };
        Ok((unit, record))
    }

    /// Whether the unit accepts no further commands.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// A unit with every transition recorded against it, oldest first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitHistory {
    /// Current persisted state.
    pub unit: Unit,
    /// Recorded transitions, creation first.
    pub transitions: Vec<UnitTransition>,
}

impl UnitHistory {
    /// Pair a unit with its records.
    pub fn new(unit: Unit, transitions: Vec<UnitTransition>) -> Self {
        Self { unit, transitions }
    }

    /// The creation record, if one was recorded for this code.
    pub fn creation(&self) -> Option<&UnitTransition> {
        self.transitions
            .iter()
            .find(|t| t.is_creation() && t.code == self.unit.code)
    }

    /// Whether an accepted command of this kind was recorded.
    pub fn has_record(&self, kind: UnitCommandKind) -> bool {
        self.transitions
            .iter()
            .filter_map(|t| t.action.command())
            .any(|c| c.kind() == kind)
    }
}
