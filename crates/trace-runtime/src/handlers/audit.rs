//! # Audit Handler
//!
//! Subscribes to every bus event, writes one structured log line per event
//! and keeps the bus-side metrics current.

use shared_bus::{Subscription, TraceEvent};
use tokio::sync::watch;
use trace_telemetry::{EVENT_BUS_MESSAGES_RECEIVED, REPORTS_SUBMITTED};
use tracing::{error, info};

const SUBSYSTEM: &str = "audit";

/// Handler for audit logging and bus metrics.
pub struct AuditHandler {
    /// Subscription with an all-events filter.
    subscription: Subscription,
    /// Flips to `true` on shutdown.
    shutdown: watch::Receiver<bool>,
}

impl AuditHandler {
    /// Create a new handler.
    pub fn new(subscription: Subscription, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            subscription,
            shutdown,
        }
    }

    /// Record one event. Returns the topic label it was counted under.
    pub fn observe(event: &TraceEvent) -> &'static str {
        let topic = event.topic().as_str();
        EVENT_BUS_MESSAGES_RECEIVED.with_label_values(&[topic]).inc();

        match event {
            TraceEvent::UnitCreated(t) | TraceEvent::UnitTransitioned(t) => info!(
                subsystem = SUBSYSTEM,
                code = %t.code,
                action = t.action.label(),
                to = %t.to,
                role = %t.role,
                at = t.at,
                "Unit transition recorded"
            ),
            TraceEvent::ReportSubmitted { report_id, at, .. } => {
                REPORTS_SUBMITTED.inc();
                info!(subsystem = SUBSYSTEM, report_id = %report_id, at = *at, "Report submitted");
            }
            TraceEvent::ReportTransitioned(t) => info!(
                subsystem = SUBSYSTEM,
                report_id = %t.report_id,
                to = %t.to,
                at = t.at,
                "Report transition recorded"
            ),
            TraceEvent::ReportAnnotated { report_id, at, .. } => {
                info!(subsystem = SUBSYSTEM, report_id = %report_id, at = *at, "Report annotated")
            }
            TraceEvent::ClassificationAlarm {
                code,
                status,
                detail,
                ..
            } => error!(
                subsystem = SUBSYSTEM,
                code = %code,
                status = %status,
                detail = %detail,
                "Classification alarm"
            ),
        }
        topic
    }

    /// Run the handler loop until shutdown or until the bus closes.
    pub async fn run(mut self) {
        info!("[audit] Audit handler started");
        loop {
            tokio::select! {
                event = self.subscription.recv() => match event {
                    Some(event) => {
                        Self::observe(&event);
                    }
                    None => break,
                },
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("[audit] Audit handler stopped");
    }
}
