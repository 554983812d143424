//! # Service Container
//!
//! Builds every subsystem with its in-memory adapters.
//!
//! ## Initialization Order
//!
//! ```text
//! Phase 1: Event bus, clock
//! Phase 2: Collaborators (credentials, entity store, ledger, disclosure policy)
//! Phase 3: Command Dispatch (wt-03)
//! Phase 4: Verification (wt-04), reading wt-03's store
//! ```
//!
//! The unit and report machines (wt-01, wt-02) are pure and need no wiring.

use std::sync::Arc;

use tracing::{info, instrument};

use shared_bus::InMemoryEventBus;
use wt_03_command_dispatch::{
    Clock, CommandDispatcher, InMemoryEntityStore, InMemoryLedger, StaticCredentialResolver,
    SystemClock,
};
use wt_04_verification::{VerificationService, WithheldCodes};

use crate::adapters::StoreHistoryReader;
use crate::container::config::RuntimeConfig;

/// Command dispatcher over the in-memory adapters.
pub type Dispatcher = CommandDispatcher<
    StaticCredentialResolver,
    InMemoryEntityStore,
    InMemoryEntityStore,
    InMemoryLedger,
>;

/// Verification service reading the dispatcher's store.
pub type Verifier = VerificationService<StoreHistoryReader<InMemoryEntityStore>, WithheldCodes>;

/// Central container holding all subsystem instances.
pub struct ServiceContainer {
    // =========================================================================
    // SUBSYSTEMS
    // =========================================================================
    /// Command Dispatch (Subsystem 3)
    pub dispatcher: Arc<Dispatcher>,

    /// Verification (Subsystem 4)
    pub verifier: Arc<Verifier>,

    // =========================================================================
    // COLLABORATORS
    // =========================================================================
    /// Token issuer and resolver.
    pub credentials: Arc<StaticCredentialResolver>,

    /// Units and reports.
    pub store: Arc<InMemoryEntityStore>,

    /// Hash-chained transition log.
    pub ledger: Arc<InMemoryLedger>,

    /// Codes withheld from public verification.
    pub disclosure: Arc<WithheldCodes>,

    // =========================================================================
    // SHARED INFRASTRUCTURE
    // =========================================================================
    /// Event Bus carrying accepted transitions and alarms.
    pub event_bus: Arc<InMemoryEventBus>,

    /// Time source for every subsystem.
    pub clock: Arc<dyn Clock>,

    /// Runtime configuration (immutable after initialization).
    pub config: RuntimeConfig,
}

impl ServiceContainer {
    /// Build the container on the system clock.
    pub fn new(config: RuntimeConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build the container on a caller-supplied clock.
    #[instrument(name = "service_init", skip(config, clock))]
    pub fn with_clock(config: RuntimeConfig, clock: Arc<dyn Clock>) -> Self {
        info!("Initializing Water-Trace service container");

        // =====================================================================
        // PHASE 1: Shared Infrastructure
        // =====================================================================
        let event_bus = Arc::new(InMemoryEventBus::with_capacity(config.event_bus_capacity));

        // =====================================================================
        // PHASE 2: Collaborators
        // =====================================================================
        let credentials = Arc::new(StaticCredentialResolver::new(
            clock.clone(),
            config.token_ttl.as_millis() as u64,
        ));
        let store = Arc::new(InMemoryEntityStore::new());
        let ledger = Arc::new(InMemoryLedger::new());
        let disclosure = Arc::new(WithheldCodes::new(config.withheld_codes.iter().cloned()));
        info!(
            withheld = disclosure.len(),
            "  Collaborators initialized (in-memory)"
        );

        // =====================================================================
        // PHASE 3: Command Dispatch
        // =====================================================================
        let dispatcher = Arc::new(CommandDispatcher::new(
            config.dispatch(),
            credentials.clone(),
            store.clone(),
            store.clone(),
            ledger.clone(),
            clock.clone(),
            event_bus.clone(),
        ));
        info!("  [03] Command Dispatch initialized");

        // =====================================================================
        // PHASE 4: Verification
        // =====================================================================
        let verifier = Arc::new(VerificationService::new(
            config.verification(),
            Arc::new(StoreHistoryReader::new(store.clone())),
            disclosure.clone(),
            event_bus.clone(),
        ));
        info!("  [04] Verification initialized");

        Self {
            dispatcher,
            verifier,
            credentials,
            store,
            ledger,
            disclosure,
            event_bus,
            clock,
            config,
        }
    }
}
