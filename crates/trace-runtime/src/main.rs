//! # Water-Trace Runtime
//!
//! Starts the provenance core with in-memory collaborators and runs until
//! interrupted.
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (logs + metrics)
//! 2. Load configuration from the environment
//! 3. Build subsystems and spawn handlers
//! 4. Wait for Ctrl-C, then shut down cleanly

use anyhow::{Context, Result};
use tracing::info;

use trace_runtime::{RuntimeConfig, TraceRuntime};
use trace_telemetry::{init_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry =
        init_telemetry(TelemetryConfig::from_env()).context("failed to initialize telemetry")?;

    let config = RuntimeConfig::from_env().context("invalid runtime configuration")?;
    info!(
        timeout_ms = config.collaborator_timeout.as_millis() as u64,
        withheld = config.withheld_codes.len(),
        "Configuration loaded"
    );

    let mut runtime = TraceRuntime::new(config);
    runtime.start();

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("Received shutdown signal");

    runtime.shutdown().await;
    Ok(())
}
