//! # Token Sweeper
//!
//! Periodically drops expired capability tokens from the in-memory table.
//! Expired tokens are already refused on resolve; this only bounds memory.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info};
use wt_03_command_dispatch::StaticCredentialResolver;

/// Periodic purge of expired tokens.
pub struct TokenSweeper {
    credentials: Arc<StaticCredentialResolver>,
    interval: Duration,
    shutdown: watch::Receiver<bool>,
}

impl TokenSweeper {
    /// Create a sweeper running every `interval`.
    pub fn new(
        credentials: Arc<StaticCredentialResolver>,
        interval: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            credentials,
            interval,
            shutdown,
        }
    }

    /// Run until shutdown.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let purged = self.credentials.purge_expired();
                    if purged > 0 {
                        debug!(purged, "Expired tokens purged");
                    }
                }
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("[tokens] Token sweeper stopped");
    }
}
