//! # Trace Telemetry
//!
//! Logging and metrics for the Water-Trace core.
//!
//! ## Components
//!
//! - **Logs**: `tracing` events through a `tracing-subscriber` registry,
//!   JSON in containers and human-readable in development
//! - **Metrics**: Prometheus counters and histograms in a dedicated registry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use trace_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("telemetry");
//!     // Commands dispatched from here on are logged and counted.
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `WT_SERVICE_NAME` | `water-trace` | Service name in logs |
//! | `WT_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `WT_JSON_LOGS` | `false` | JSON log output |
//! | `WT_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `WT_ENVIRONMENT` | `development` | Deployment environment |

mod config;
mod logging;
pub mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    encode_metrics, register_metrics, MetricsHandle, CLASSIFICATION_ALARMS, DISPATCH_ACCEPTED,
    DISPATCH_DURATION, DISPATCH_REJECTED, EVENT_BUS_MESSAGES_RECEIVED, REPORTS_SUBMITTED,
    VERIFICATIONS,
};
pub use tracing_setup::{build_filter, init_tracing};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The global subscriber could not be installed.
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracerInit(String),

    /// A metric could not be registered or encoded.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// Log filter or other settings are malformed.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    // Metrics first so early log lines can be counted
    let metrics = register_metrics()?;

    tracing_setup::init_tracing(&config)?;

    Ok(TelemetryGuard {
        service_name: config.full_service_name(),
        metrics,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    service_name: String,
    metrics: MetricsHandle,
}

impl TelemetryGuard {
    /// Metrics handle for scraping.
    pub fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry...");
    }
}
