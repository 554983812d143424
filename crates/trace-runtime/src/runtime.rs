//! # Trace Runtime
//!
//! Owns the service container and the background handlers.
//!
//! ## Startup Sequence
//!
//! 1. Load and validate configuration
//! 2. Build the service container (bus, collaborators, subsystems)
//! 3. Spawn the audit handler and the token sweeper
//! 4. Serve the surface until shutdown

use std::sync::Arc;
use std::time::Duration;

use shared_bus::EventFilter;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::container::{RuntimeConfig, ServiceContainer};
use crate::handlers::{AuditHandler, TokenSweeper};
use crate::surface::TraceSurface;

/// How often expired tokens are dropped.
pub const TOKEN_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// The runtime orchestrating all subsystems.
pub struct TraceRuntime {
    container: Arc<ServiceContainer>,
    surface: Arc<TraceSurface>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl TraceRuntime {
    /// Create a runtime over a freshly built container.
    pub fn new(config: RuntimeConfig) -> Self {
        Self::from_container(ServiceContainer::new(config))
    }

    /// Create a runtime over an existing container.
    pub fn from_container(container: ServiceContainer) -> Self {
        let container = Arc::new(container);
        let surface = Arc::new(TraceSurface::new(
            container.dispatcher.clone(),
            container.verifier.clone(),
        ));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            container,
            surface,
            shutdown_tx,
            shutdown_rx,
            tasks: Vec::new(),
        }
    }

    /// Spawn the background handlers. Must be called inside a Tokio runtime.
    pub fn start(&mut self) {
        info!("===========================================");
        info!("  Water-Trace Runtime v{}", crate::VERSION);
        info!("===========================================");

        let audit = AuditHandler::new(
            self.container.event_bus.subscribe(EventFilter::all()),
            self.shutdown_rx.clone(),
        );
        self.tasks.push(tokio::spawn(audit.run()));

        let sweeper = TokenSweeper::new(
            self.container.credentials.clone(),
            TOKEN_SWEEP_INTERVAL,
            self.shutdown_rx.clone(),
        );
        self.tasks.push(tokio::spawn(sweeper.run()));

        info!(handlers = self.tasks.len(), "Runtime ready");
    }

    /// The exposed command, verification and report surfaces.
    pub fn surface(&self) -> Arc<TraceSurface> {
        self.surface.clone()
    }

    /// The wired services.
    pub fn container(&self) -> &ServiceContainer {
        &self.container
    }

    /// Signal shutdown and wait for every handler to stop.
    pub async fn shutdown(self) {
        info!(
            events_published = self.container.event_bus.published(),
            "Shutting down runtime"
        );
        let _ = self.shutdown_tx.send(true);
        for task in self.tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "Handler task ended abnormally");
            }
        }
        match self.container.ledger.verify_chain() {
            Ok(()) => info!(entries = self.container.ledger.len(), "Ledger chain intact"),
            Err(seq) => warn!(sequence = seq, "Ledger chain broken"),
        }
    }
}
