//! # Test Fixtures
//!
//! A fully wired container on a manual clock, with helpers to mint
//! credentials and drive units into a given state.

use std::sync::Arc;

use shared_types::{
    CapabilityToken, Principal, RejectionReason, Role, Timestamp, UnitStatus, UnitType,
};
use trace_runtime::{RuntimeConfig, ServiceContainer, TraceSurface};
use wt_01_unit_lifecycle::Unit;
use wt_03_command_dispatch::{DispatchError, ManualClock};

/// Clock reading every fixture starts from.
pub const START: Timestamp = 1_700_000_000_000;

/// Wired services plus the surface over them.
pub struct TestTrace {
    /// Every subsystem and collaborator.
    pub container: ServiceContainer,
    /// Command, report and verification entry points.
    pub surface: TraceSurface,
    /// Shared time source.
    pub clock: Arc<ManualClock>,
}

impl Default for TestTrace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTrace {
    /// Default configuration.
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    /// Custom configuration.
    pub fn with_config(config: RuntimeConfig) -> Self {
        let clock = Arc::new(ManualClock::new(START));
        let container = ServiceContainer::with_clock(config, clock.clone());
        let surface = TraceSurface::new(container.dispatcher.clone(), container.verifier.clone());
        Self {
            container,
            surface,
            clock,
        }
    }

    /// Issue a token for `id` holding `role`.
    pub fn token(&self, id: &str, role: Role) -> CapabilityToken {
        self.container.credentials.issue(Principal::new(id, role))
    }

    /// `prod-1`
    pub fn producer(&self) -> CapabilityToken {
        self.token("prod-1", Role::Producer)
    }

    /// `insp-1`
    pub fn inspector(&self) -> CapabilityToken {
        self.token("insp-1", Role::Inspector)
    }

    /// `dist-1`
    pub fn distributor(&self) -> CapabilityToken {
        self.token("dist-1", Role::Distributor)
    }

    /// `admin-1`
    pub fn admin(&self) -> CapabilityToken {
        self.token("admin-1", Role::Admin)
    }

    /// Advance the clock by one millisecond.
    pub fn tick(&self) {
        self.clock.advance(1);
    }

    /// Create `code` and walk it along the shortest legal path to `status`.
    pub async fn unit_in(&self, code: &str, status: UnitStatus) -> Result<Unit, DispatchError> {
        let surface = &self.surface;
        let mut unit = surface
            .create_unit(&self.producer(), Some(code), UnitType::Bag, 10)
            .await?
            .state;

        let inspector = self.inspector();
        let distributor = self.distributor();
        let path: &[UnitStatus] = match status {
            UnitStatus::Created => &[],
            UnitStatus::Inspector => &[UnitStatus::Inspector],
            UnitStatus::Approved => &[UnitStatus::Inspector, UnitStatus::Approved],
            UnitStatus::Distributed => &[
                UnitStatus::Inspector,
                UnitStatus::Approved,
                UnitStatus::Distributed,
            ],
            UnitStatus::Sold => &[
                UnitStatus::Inspector,
                UnitStatus::Approved,
                UnitStatus::Distributed,
                UnitStatus::Sold,
            ],
            UnitStatus::RejectedContaminated => {
                &[UnitStatus::Inspector, UnitStatus::RejectedContaminated]
            }
            UnitStatus::RejectedExpired => &[UnitStatus::Inspector, UnitStatus::RejectedExpired],
        };

        for step in path {
            self.tick();
            let next = match step {
                UnitStatus::Inspector => surface.submit_for_inspection(&inspector, code).await?,
                UnitStatus::Approved => surface.approve(&inspector, code).await?,
                UnitStatus::Distributed => surface.distribute(&distributor, code).await?,
                UnitStatus::Sold => surface.sell(&distributor, code).await?,
                UnitStatus::RejectedContaminated => {
                    surface
                        .reject(&inspector, code, RejectionReason::Contaminated.as_str())
                        .await?
                }
                UnitStatus::RejectedExpired => {
                    surface
                        .reject(&inspector, code, RejectionReason::Expired.as_str())
                        .await?
                }
                UnitStatus::Created => continue,
            };
            unit = next.state;
        }
        Ok(unit)
    }
}
