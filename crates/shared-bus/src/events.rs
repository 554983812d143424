//! # Trace Events
//!
//! Defines all event types that flow through the shared bus.
//! Every accepted transition is published exactly once, after the ledger
//! append. Events never cascade: a report event never changes a unit and
//! vice versa.

use serde::{Deserialize, Serialize};
use shared_types::entities::{
    PrincipalId, ReportId, ReportTransition, Timestamp, UnitCode, UnitStatus, UnitTransition,
};

/// Subsystem identifiers used as event sources.
pub mod subsystem {
    /// Unit lifecycle (wt-01).
    pub const UNIT_LIFECYCLE: u8 = 1;
    /// Report triage (wt-02).
    pub const REPORT_TRIAGE: u8 = 2;
    /// Command dispatch (wt-03).
    pub const COMMAND_DISPATCH: u8 = 3;
    /// Verification (wt-04).
    pub const VERIFICATION: u8 = 4;
}

/// All events that can be published to the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TraceEvent {
    // =========================================================================
    // SUBSYSTEM 1: UNIT LIFECYCLE
    // =========================================================================
    /// A unit was registered. Carries the creation record.
    UnitCreated(UnitTransition),

    /// A unit command was accepted and persisted.
    UnitTransitioned(UnitTransition),

    // =========================================================================
    // SUBSYSTEM 2: REPORT TRIAGE
    // =========================================================================
    /// A consumer report was filed.
    ReportSubmitted {
        /// The new report.
        report_id: ReportId,
        /// Unit the report is about, if any.
        subject_code: Option<UnitCode>,
        /// Submission time.
        at: Timestamp,
    },

    /// A triage command was accepted and persisted.
    ReportTransitioned(ReportTransition),

    /// An admin appended notes without changing status.
    ReportAnnotated {
        /// Annotated report.
        report_id: ReportId,
        /// Acting admin.
        actor: PrincipalId,
        /// Annotation time.
        at: Timestamp,
    },

    // =========================================================================
    // SUBSYSTEM 4: VERIFICATION
    // =========================================================================
    /// A unit history matched no classification rule.
    ClassificationAlarm {
        /// The unit that was classified.
        code: UnitCode,
        /// Its current status.
        status: UnitStatus,
        /// What did not line up.
        detail: String,
        /// Last modification time of the classified unit.
        at: Timestamp,
    },
}

impl TraceEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::UnitCreated(_) | Self::UnitTransitioned(_) => EventTopic::Units,
            Self::ReportSubmitted { .. }
            | Self::ReportTransitioned(_)
            | Self::ReportAnnotated { .. } => EventTopic::Reports,
            Self::ClassificationAlarm { .. } => EventTopic::Alarms,
        }
    }

    /// Get the originating subsystem ID.
    #[must_use]
    pub fn source_subsystem(&self) -> u8 {
        match self {
            Self::UnitCreated(_) | Self::UnitTransitioned(_) => subsystem::UNIT_LIFECYCLE,
            Self::ReportSubmitted { .. }
            | Self::ReportTransitioned(_)
            | Self::ReportAnnotated { .. } => subsystem::REPORT_TRIAGE,
            Self::ClassificationAlarm { .. } => subsystem::VERIFICATION,
        }
    }

    /// Stable key of the entity this event concerns.
    #[must_use]
    pub fn entity_key(&self) -> String {
        match self {
            Self::UnitCreated(t) | Self::UnitTransitioned(t) => t.code.to_string(),
            Self::ReportSubmitted { report_id, .. } | Self::ReportAnnotated { report_id, .. } => {
                report_id.to_string()
            }
            Self::ReportTransitioned(t) => t.report_id.to_string(),
            Self::ClassificationAlarm { code, .. } => code.to_string(),
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Unit lifecycle events.
    Units,
    /// Report triage events.
    Reports,
    /// Classification alarms.
    Alarms,
    /// All events (no filtering).
    All,
}

impl EventTopic {
    /// Lowercase label, used as a metric dimension.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Units => "units",
            Self::Reports => "reports",
            Self::Alarms => "alarms",
            Self::All => "all",
        }
    }
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Source subsystems to include. Empty means all sources.
    pub source_subsystems: Vec<u8>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            source_subsystems: Vec::new(),
        }
    }

    /// Create a filter for events from specific subsystems.
    #[must_use]
    pub fn from_subsystems(subsystems: Vec<u8>) -> Self {
        Self {
            topics: Vec::new(),
            source_subsystems: subsystems,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &TraceEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let source_match = self.source_subsystems.is_empty()
            || self.source_subsystems.contains(&event.source_subsystem());

        topic_match && source_match
    }
}
