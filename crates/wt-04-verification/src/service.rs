//! Verification Service - public read-side lookups
//!
//! Reconstructs a unit's history, classifies it and projects it to a
//! `UnitView`. Never writes. An `UNKNOWN` label raises an alarm but the
//! view is still returned; alarms are defects, not caller errors.

use crate::domain::{UnitView, VerificationError};
use crate::ports::inbound::VerificationApi;
use crate::ports::outbound::{DisclosurePolicy, HistoryReader};
use async_trait::async_trait;
use shared_bus::{EventPublisher, TraceEvent};
use shared_types::UnitCode;
use std::sync::Arc;
use std::time::Duration;
use trace_telemetry::{log_unit_event, CLASSIFICATION_ALARMS, VERIFICATIONS};
use tracing::debug;
use wt_01_unit_lifecycle::assess;

const SUBSYSTEM: &str = "verification";

/// Verification configuration
#[derive(Clone, Debug)]
pub struct VerificationConfig {
    /// Upper bound on a history read.
    pub lookup_timeout: Duration,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            lookup_timeout: Duration::from_secs(2),
        }
    }
}

/// Verification Service implementation
pub struct VerificationService<H, D>
where
    H: HistoryReader,
    D: DisclosurePolicy,
{
    config: VerificationConfig,
    reader: Arc<H>,
    policy: Arc<D>,
    bus: Arc<dyn EventPublisher>,
}

impl<H, D> VerificationService<H, D>
where
    H: HistoryReader,
    D: DisclosurePolicy,
{
    /// Create a new verification service
    pub fn new(
        config: VerificationConfig,
        reader: Arc<H>,
        policy: Arc<D>,
        bus: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            config,
            reader,
            policy,
            bus,
        }
    }

    async fn lookup(&self, raw: &str) -> Result<UnitView, VerificationError> {
        let Ok(code) = UnitCode::parse(raw) else {
            debug!(subsystem = SUBSYSTEM, "Malformed code");
            return Err(VerificationError::NotFound);
        };
        if self.policy.is_withheld(&code) {
            debug!(subsystem = SUBSYSTEM, "Withheld code requested");
            return Err(VerificationError::NotFound);
        }

        let history =
            match tokio::time::timeout(self.config.lookup_timeout, self.reader.unit_history(&code))
                .await
            {
                Ok(result) => result?,
                Err(_) => {
                    return Err(VerificationError::Unavailable(format!(
                        "history read exceeded {:?}",
                        self.config.lookup_timeout
                    )))
                }
            };

        let assessment = assess(&history);
        if let Some(detail) = assessment.anomaly {
            CLASSIFICATION_ALARMS.inc();
            log_unit_event!(
                error,
                SUBSYSTEM,
                "Unit history matched no classification rule",
                code,
                status = %history.unit.status,
                detail = %detail
            );
            self.bus
                .publish(TraceEvent::ClassificationAlarm {
                    code: code.clone(),
                    status: history.unit.status,
                    detail,
                    at: history.unit.last_modified_at,
                })
                .await;
        }

        log_unit_event!(
            debug,
            SUBSYSTEM,
            "Unit verified",
            code,
            classification = assessment.classification.as_str()
        );
        Ok(UnitView::project(&history, assessment.classification))
    }
}

#[async_trait]
impl<H, D> VerificationApi for VerificationService<H, D>
where
    H: HistoryReader + 'static,
    D: DisclosurePolicy + 'static,
{
    async fn verify(&self, code: &str) -> Result<UnitView, VerificationError> {
        let result = self.lookup(code).await;
        let label = match &result {
            Ok(view) => view.classification.as_str(),
            Err(VerificationError::NotFound) => "NOT_FOUND",
            Err(VerificationError::Unavailable(_)) => "UNAVAILABLE",
        };
        VERIFICATIONS.with_label_values(&[label]).inc();
        result
    }
}
