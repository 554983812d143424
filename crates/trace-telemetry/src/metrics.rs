//! Prometheus metrics for Water-Trace.
//!
//! All metrics follow the naming convention: `wt_<area>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., wt_reports_submitted_total)
//! - **Histogram**: Distribution of values (e.g., wt_dispatch_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // DISPATCH METRICS
    // =========================================================================

    /// Accepted commands by entity and command name
    pub static ref DISPATCH_ACCEPTED: CounterVec = CounterVec::new(
        Opts::new("wt_dispatch_accepted_total", "Commands accepted by the dispatcher"),
        &["entity", "command"]  // entity: unit/report
    ).expect("metric creation failed");

    /// Rejected commands by error kind
    pub static ref DISPATCH_REJECTED: CounterVec = CounterVec::new(
        Opts::new("wt_dispatch_rejected_total", "Commands rejected by the dispatcher"),
        &["kind"]  // kind: FORBIDDEN/ILLEGAL_TRANSITION/...
    ).expect("metric creation failed");

    /// Dispatch latency, credential check through publish
    pub static ref DISPATCH_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "wt_dispatch_duration_seconds",
            "Time spent handling a command"
        ).buckets(exponential_buckets(0.0001, 2.0, 15).expect("valid buckets"))
    ).expect("metric creation failed");

    /// Reports filed by consumers
    pub static ref REPORTS_SUBMITTED: Counter = Counter::new(
        "wt_reports_submitted_total",
        "Total consumer reports submitted"
    ).expect("metric creation failed");

    // =========================================================================
    // VERIFICATION METRICS
    // =========================================================================

    /// Verifications by resulting classification
    pub static ref VERIFICATIONS: CounterVec = CounterVec::new(
        Opts::new("wt_verifications_total", "Public verification lookups"),
        &["classification"]  // SAFE/UNSAFE/SUSPICIOUS/UNRECOGNISABLE/UNKNOWN/NOT_FOUND
    ).expect("metric creation failed");

    /// Histories that matched no classification rule (alerting)
    pub static ref CLASSIFICATION_ALARMS: Counter = Counter::new(
        "wt_classification_alarms_total",
        "Unit histories that could not be classified"
    ).expect("metric creation failed");

    // =========================================================================
    // EVENT BUS METRICS
    // =========================================================================

    /// Events observed by runtime handlers
    pub static ref EVENT_BUS_MESSAGES_RECEIVED: CounterVec = CounterVec::new(
        Opts::new("wt_eventbus_messages_received_total", "Events received from the bus"),
        &["topic"]
    ).expect("metric creation failed");
}

/// Handle to the registry holding all Water-Trace metrics.
#[derive(Clone)]
pub struct MetricsHandle {
    registry: Arc<Registry>,
}

impl MetricsHandle {
    /// Encode the registry in Prometheus text format.
    pub fn encode(&self) -> Result<String, TelemetryError> {
        encode_registry(&self.registry)
    }
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; already registered collectors are skipped.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Dispatch
        Box::new(DISPATCH_ACCEPTED.clone()),
        Box::new(DISPATCH_REJECTED.clone()),
        Box::new(DISPATCH_DURATION.clone()),
        Box::new(REPORTS_SUBMITTED.clone()),
        // Verification
        Box::new(VERIFICATIONS.clone()),
        Box::new(CLASSIFICATION_ALARMS.clone()),
        // Event Bus
        Box::new(EVENT_BUS_MESSAGES_RECEIVED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    encode_registry(&REGISTRY)
}

fn encode_registry(registry: &Registry) -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
