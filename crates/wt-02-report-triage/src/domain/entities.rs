//! # Domain Entities
//!
//! The report aggregate and its submission payload.

use super::errors::TriageError;
use crate::algorithms::transition;
use serde::{Deserialize, Serialize};
use shared_types::{
    Capability, Principal, PrincipalId, ReportAction, ReportCommand, ReportId, ReportStatus,
    ReportTransition, Timestamp,
};

/// Marker stored when a reporter leaves name or email blank.
pub const ANONYMOUS_MARKER: &str = "anonymous";

/// Default upper bound on report reason length, in characters.
pub const DEFAULT_MAX_REASON_LEN: usize = 2000;

/// One row of the report capability table.
pub type ReportRow = Capability<ReportStatus, ReportCommand>;

/// A consumer-filed quality or safety complaint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Assigned at submission.
    pub id: ReportId,
    /// Advisory reference to a unit code or batch number.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub subject_code: Option<String>,
    /// What the reporter observed.
    pub reason: String,
    /// Reporter name, or the anonymous marker.
    pub reporter_name: String,
    /// Reporter email, or the anonymous marker.
    pub reporter_email: String,
    /// Triage state.
    pub status: ReportStatus,
    /// Notes appended by admins, newline separated.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub admin_notes: Option<String>,
    /// Admin who last moved the report away from `PENDING`.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub resolved_by: Option<PrincipalId>,
    /// Submission time, immutable.
    pub reported_at: Timestamp,
    /// Time of the last accepted change (transition or annotation).
    pub last_modified_at: Timestamp,
}

/// Payload of the report submission surface.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    /// Unit code or batch number, if the reporter knows it.
    #[serde(default)]
    pub subject_code: Option<String>,
    /// Free-text description. Required.
    pub reason: String,
    /// Optional reporter name.
    #[serde(default)]
    pub reporter_name: Option<String>,
    /// Optional reporter email.
    #[serde(default)]
    pub reporter_email: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Append `notes` to existing admin notes, newline separated.
///
/// Blank notes leave the existing value unchanged.
pub fn append_notes(existing: Option<&str>, notes: &str) -> Option<String> {
    let notes = notes.trim();
    match (existing, notes.is_empty()) {
        (existing, true) => existing.map(str::to_string),
        (Some(prev), false) => Some(format!("{}\n{}", prev, notes)),
        (None, false) => Some(notes.to_string()),
    }
}

impl NewReport {
    /// Anonymous report with only a reason.
    pub fn anonymous(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            ..Self::default()
        }
    }
}

impl Report {
    /// File a report. Any caller may do this, including anonymous ones.
    pub fn submit(
        new: &NewReport,
        id: ReportId,
        at: Timestamp,
        max_reason_len: usize,
    ) -> Result<(Report, ReportTransition), TriageError> {
        let reason = new.reason.trim();
        if reason.is_empty() {
            return Err(TriageError::InvalidPayload(
                "reason must not be empty".to_string(),
            ));
        }
        let len = reason.chars().count();
        if len > max_reason_len {
            return Err(TriageError::InvalidPayload(format!(
                "reason too long: {} > {}",
                len, max_reason_len
            )));
        }

        let report = Report {
            id,
            subject_code: non_blank(new.subject_code.as_deref()),
            reason: reason.to_string(),
            reporter_name: non_blank(new.reporter_name.as_deref())
                .unwrap_or_else(|| ANONYMOUS_MARKER.to_string()),
            reporter_email: non_blank(new.reporter_email.as_deref())
                .unwrap_or_else(|| ANONYMOUS_MARKER.to_string()),
            status: ReportStatus::Pending,
            admin_notes: None,
            resolved_by: None,
            reported_at: at,
            last_modified_at: at,
        };
        let record = ReportTransition {
            report_id: id,
            from: None,
            to: ReportStatus::Pending,
            action: ReportAction::Submitted,
            notes: None,
            actor: None,
            at,
        };
        Ok((report, record))
    }

    /// Apply a triage command, optionally attaching notes.
    ///
    /// `self` is left untouched so the caller can compare-and-set against it.
    pub fn apply(
        &self,
        command: ReportCommand,
        notes: Option<&str>,
        actor: &Principal,
        now: Timestamp,
    ) -> Result<(Report, ReportTransition), TriageError> {
        let next = transition(self.status, command)?;
        let at = now.max(self.last_modified_at.saturating_add(1));
        let notes = non_blank(notes);

        let mut report = self.clone();
        report.status = next;
        report.last_modified_at = at;
        if let Some(notes) = notes.as_deref() {
            report.admin_notes = append_notes(self.admin_notes.as_deref(), notes);
        }
        if self.status == ReportStatus::Pending {
            report.resolved_by = Some(actor.id.clone());
        }

        let record = ReportTransition {
            report_id: self.id,
            from: Some(self.status),
            to: next,
            action: ReportAction::Triage(command),
            notes,
            actor: Some(actor.id.clone()),
            at,
        };
        Ok((report, record))
    }

    /// Append notes without changing status. Not a transition: the triage
    /// table is not consulted, so this works in every status.
    pub fn annotate(&self, notes: &str, now: Timestamp) -> Result<Report, TriageError> {
        if notes.trim().is_empty() {
            return Err(TriageError::InvalidPayload(
                "notes must not be empty".to_string(),
            ));
        }
        let mut report = self.clone();
        report.admin_notes = append_notes(self.admin_notes.as_deref(), notes);
        report.last_modified_at = now.max(self.last_modified_at.saturating_add(1));
        Ok(report)
    }
}
