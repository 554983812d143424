//! # Core Domain Entities
//!
//! Defines the canonical schema shared by every subsystem.
//!
//! ## Clusters
//!
//! - **Identity**: `Role`, `Principal`, `PrincipalId`, `CapabilityToken`
//! - **Units**: `UnitCode`, `UnitType`, `UnitStatus`, `RejectionReason`, `UnitCommand`
//! - **Reports**: `ReportId`, `ReportStatus`, `ReportCommand`
//! - **Records**: `UnitTransition`, `ReportTransition`, `TransitionRecord`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::{InvalidUnitCode, UnknownRejectionReason};

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// Maximum length of a unit code.
pub const MAX_UNIT_CODE_LEN: usize = 64;

/// Prefix used for generated unit codes.
pub const UNIT_CODE_PREFIX: &str = "WAT-";

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// The single role a principal holds, as asserted by its credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Creates units.
    Producer,
    /// Inspects, approves and rejects units.
    Inspector,
    /// Moves approved units to market.
    Distributor,
    /// Triages reports.
    Admin,
}

impl Role {
    /// Every role, in supply-chain order.
    pub const ALL: [Role; 4] = [
        Role::Producer,
        Role::Inspector,
        Role::Distributor,
        Role::Admin,
    ];

    /// Wire name of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Producer => "PRODUCER",
            Role::Inspector => "INSPECTOR",
            Role::Distributor => "DISTRIBUTOR",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque identity of a principal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(pub String);

impl PrincipalId {
    /// Create a principal identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An authenticated actor with exactly one role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    /// Opaque identity.
    pub id: PrincipalId,
    /// Role asserted by the credential.
    pub role: Role,
}

impl Principal {
    /// Create a principal.
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: PrincipalId::new(id),
            role,
        }
    }
}

/// Opaque, externally issued credential.
///
/// The core never decodes it. `Debug` is redacted so the token cannot leak
/// through logs.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityToken(String);

impl CapabilityToken {
    /// Wrap a raw token string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw token (for credential collaborators only).
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CapabilityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CapabilityToken(***)")
    }
}

// =============================================================================
// CLUSTER B: UNITS
// =============================================================================

/// Globally unique, immutable unit (or batch) code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UnitCode(String);

impl UnitCode {
    /// Parse and validate a code: non-empty, ASCII, no whitespace, bounded length.
    pub fn parse(raw: &str) -> Result<Self, InvalidUnitCode> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InvalidUnitCode::Empty);
        }
        if trimmed.len() > MAX_UNIT_CODE_LEN {
            return Err(InvalidUnitCode::TooLong {
                len: trimmed.len(),
                max: MAX_UNIT_CODE_LEN,
            });
        }
        if !trimmed.chars().all(|c| c.is_ascii_graphic()) {
            return Err(InvalidUnitCode::IllegalCharacter);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Generate a fresh code (`WAT-` followed by 12 uppercase hex characters).
    #[must_use]
    pub fn generate() -> Self {
        let simple = Uuid::new_v4().simple().to_string().to_uppercase();
        Self(format!("{}{}", UNIT_CODE_PREFIX, &simple[..12]))
    }

    /// Borrow the code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UnitCode {
    type Error = InvalidUnitCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<UnitCode> for String {
    fn from(code: UnitCode) -> Self {
        code.0
    }
}

impl FromStr for UnitCode {
    type Err = InvalidUnitCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Packaging of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitType {
    /// Sachet / bag.
    Bag,
    /// Bundled pack.
    Pack,
}

/// Lifecycle state of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitStatus {
    /// Registered by a producer.
    Created,
    /// Submitted and awaiting an inspection outcome.
    Inspector,
    /// Passed inspection.
    Approved,
    /// Handed to distribution.
    Distributed,
    /// Sold to a consumer. Terminal.
    Sold,
    /// Failed inspection: contamination. Terminal.
    RejectedContaminated,
    /// Failed inspection: expired. Terminal.
    RejectedExpired,
}

impl UnitStatus {
    /// Every unit status.
    pub const ALL: [UnitStatus; 7] = [
        UnitStatus::Created,
        UnitStatus::Inspector,
        UnitStatus::Approved,
        UnitStatus::Distributed,
        UnitStatus::Sold,
        UnitStatus::RejectedContaminated,
        UnitStatus::RejectedExpired,
    ];

    /// Terminal states accept no further commands.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Sold | Self::RejectedContaminated | Self::RejectedExpired
        )
    }

    /// Whether this is one of the `REJECTED_*` states.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        self.rejection_reason().is_some()
    }

    /// The rejection reason encoded by a `REJECTED_*` state.
    #[must_use]
    pub fn rejection_reason(&self) -> Option<RejectionReason> {
        match self {
            Self::RejectedContaminated => Some(RejectionReason::Contaminated),
            Self::RejectedExpired => Some(RejectionReason::Expired),
            _ => None,
        }
    }

    /// Wire name of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Inspector => "INSPECTOR",
            Self::Approved => "APPROVED",
            Self::Distributed => "DISTRIBUTED",
            Self::Sold => "SOLD",
            Self::RejectedContaminated => "REJECTED_CONTAMINATED",
            Self::RejectedExpired => "REJECTED_EXPIRED",
        }
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of inspection rejection reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionReason {
    /// Water failed a contamination test.
    Contaminated,
    /// Unit is past its shelf life.
    Expired,
}

impl RejectionReason {
    /// Wire name of the reason.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contaminated => "CONTAMINATED",
            Self::Expired => "EXPIRED",
        }
    }

    /// The rejected state this reason leads to.
    #[must_use]
    pub fn rejected_status(&self) -> UnitStatus {
        match self {
            Self::Contaminated => UnitStatus::RejectedContaminated,
            Self::Expired => UnitStatus::RejectedExpired,
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RejectionReason {
    type Err = UnknownRejectionReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CONTAMINATED" => Ok(Self::Contaminated),
            "EXPIRED" => Ok(Self::Expired),
            _ => Err(UnknownRejectionReason(s.to_string())),
        }
    }
}

/// Payload-free name of a unit command, used as the capability table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitCommandKind {
    /// `submit-for-inspection`
    SubmitForInspection,
    /// `approve`
    Approve,
    /// `reject`
    Reject,
    /// `distribute`
    Distribute,
    /// `sell`
    Sell,
}

impl UnitCommandKind {
    /// Every unit command.
    pub const ALL: [UnitCommandKind; 5] = [
        Self::SubmitForInspection,
        Self::Approve,
        Self::Reject,
        Self::Distribute,
        Self::Sell,
    ];

    /// Wire name of the command.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SubmitForInspection => "submit-for-inspection",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Distribute => "distribute",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for UnitCommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit command together with its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum UnitCommand {
    /// Move a created unit into inspection.
    SubmitForInspection,
    /// Pass inspection.
    Approve,
    /// Fail inspection with a reason.
    Reject {
        /// Why the unit failed.
        reason: RejectionReason,
    },
    /// Hand an approved unit to distribution.
    Distribute,
    /// Record the sale of a distributed unit.
    Sell,
}

impl UnitCommand {
    /// Payload-free command name.
    #[must_use]
    pub fn kind(&self) -> UnitCommandKind {
        match self {
            Self::SubmitForInspection => UnitCommandKind::SubmitForInspection,
            Self::Approve => UnitCommandKind::Approve,
            Self::Reject { .. } => UnitCommandKind::Reject,
            Self::Distribute => UnitCommandKind::Distribute,
            Self::Sell => UnitCommandKind::Sell,
        }
    }
}

// =============================================================================
// CLUSTER C: REPORTS
// =============================================================================

/// Unique report identifier, assigned at submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(pub Uuid);

impl ReportId {
    /// Allocate a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ReportId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReportId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Triage state of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    /// Filed, not yet looked at.
    Pending,
    /// Under investigation by an admin.
    Investigating,
    /// Closed with an outcome. Terminal.
    Resolved,
    /// Closed without action; may be reopened.
    Dismissed,
}

impl ReportStatus {
    /// Every report status.
    pub const ALL: [ReportStatus; 4] = [
        Self::Pending,
        Self::Investigating,
        Self::Resolved,
        Self::Dismissed,
    ];

    /// Only `RESOLVED` is terminal; `DISMISSED` can be reopened.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved)
    }

    /// Wire name of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Investigating => "INVESTIGATING",
            Self::Resolved => "RESOLVED",
            Self::Dismissed => "DISMISSED",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report triage commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportCommand {
    /// `start-investigation`
    StartInvestigation,
    /// `dismiss`
    Dismiss,
    /// `resolve`
    Resolve,
    /// `reopen`
    Reopen,
}

impl ReportCommand {
    /// Every triage command.
    pub const ALL: [ReportCommand; 4] = [
        Self::StartInvestigation,
        Self::Dismiss,
        Self::Resolve,
        Self::Reopen,
    ];

    /// Wire name of the command.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StartInvestigation => "start-investigation",
            Self::Dismiss => "dismiss",
            Self::Resolve => "resolve",
            Self::Reopen => "reopen",
        }
    }
}

impl fmt::Display for ReportCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// CLUSTER D: CAPABILITIES AND RECORDS
// =============================================================================

/// One row of a declarative transition table: `command` is legal from `from`
/// for any of `roles`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability<S: 'static, C: 'static> {
    /// Source state.
    pub from: S,
    /// Command name.
    pub command: C,
    /// Roles allowed to issue the command.
    pub roles: &'static [Role],
}

impl<S, C> Capability<S, C> {
    /// Whether `role` may issue this row's command.
    #[must_use]
    pub fn permits(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// What happened to a unit in one recorded step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "kebab-case")]
pub enum UnitAction {
    /// The unit was registered.
    Created {
        /// Packaging type.
        #[serde(rename = "unitType")]
        unit_type: UnitType,
        /// Number of packs in the unit.
        quantity: u32,
    },
    /// An accepted command.
    Command(UnitCommand),
}

impl UnitAction {
    /// The command, if this step was not the creation.
    #[must_use]
    pub fn command(&self) -> Option<&UnitCommand> {
        match self {
            Self::Created { .. } => None,
            Self::Command(command) => Some(command),
        }
    }

    /// Short label for logs and views.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Created { .. } => "create",
            Self::Command(command) => command.kind().as_str(),
        }
    }
}

/// An accepted unit state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitTransition {
    /// Target unit.
    pub code: UnitCode,
    /// Previous state; absent for the creation record.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub from: Option<UnitStatus>,
    /// New state.
    pub to: UnitStatus,
    /// Command or creation payload.
    pub action: UnitAction,
    /// Acting principal.
    pub actor: PrincipalId,
    /// Role the actor held.
    pub role: Role,
    /// When the transition was accepted.
    pub at: Timestamp,
}

impl UnitTransition {
    /// Whether this is the creation record.
    #[must_use]
    pub fn is_creation(&self) -> bool {
        self.from.is_none() && matches!(self.action, UnitAction::Created { .. })
    }
}

/// What happened to a report in one recorded step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportAction {
    /// The report was filed.
    Submitted,
    /// A triage command.
    Triage(ReportCommand),
}

/// An accepted report state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTransition {
    /// Target report.
    pub report_id: ReportId,
    /// Previous state; absent for the submission record.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub from: Option<ReportStatus>,
    /// New state.
    pub to: ReportStatus,
    /// Submission or triage command.
    pub action: ReportAction,
    /// Notes attached with the transition.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub notes: Option<String>,
    /// Acting admin; absent for anonymous submissions.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub actor: Option<PrincipalId>,
    /// When the transition was accepted.
    pub at: Timestamp,
}

/// A record handed to the ledger/audit sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entity", rename_all = "lowercase")]
pub enum TransitionRecord {
    /// A unit transition.
    Unit(UnitTransition),
    /// A report transition.
    Report(ReportTransition),
}

impl TransitionRecord {
    /// When the record was accepted.
    #[must_use]
    pub fn at(&self) -> Timestamp {
        match self {
            Self::Unit(t) => t.at,
            Self::Report(t) => t.at,
        }
    }

    /// Stable string key of the target entity.
    #[must_use]
    pub fn entity_key(&self) -> String {
        match self {
            Self::Unit(t) => t.code.to_string(),
            Self::Report(t) => t.report_id.to_string(),
        }
    }
}
