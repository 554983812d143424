//! # Shared Bus - Event Bus for Trace Events
//!
//! Every transition the dispatcher accepts is published here after it has
//! been persisted and appended to the ledger. Subscribers (audit log,
//! metrics, downstream notifiers) observe; they never feed back into the
//! state machines.
//!
//! ## Choreography
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │  Dispatcher  │                    │ Audit/Metric │
//! │              │    publish()       │  handlers    │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! ## Rules
//!
//! - **No cascade:** a report event never transitions a unit, and vice versa.
//! - **Publish after commit:** an event implies the transition is durable.
//! - **Lossy on lag:** slow subscribers skip events rather than block writers.

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{subsystem, EventFilter, EventTopic, TraceEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
