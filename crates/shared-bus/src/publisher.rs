//! # Publisher
//!
//! The write side of the bus and its in-memory, broadcast-backed adapter.

use crate::events::{EventFilter, TraceEvent};
use crate::subscriber::{EventStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::debug;

/// Where accepted transitions and alarms are announced.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Announce `event`; returns how many subscribers were listening.
    async fn publish(&self, event: TraceEvent) -> usize;
}

/// Broadcast bus living in the process.
///
/// Publishing never waits. With nobody subscribed the event is dropped,
/// which is normal before the runtime's handlers start.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<TraceEvent>,
    published: AtomicU64,
    capacity: usize,
}

impl InMemoryEventBus {
    /// Bus with [`DEFAULT_CHANNEL_CAPACITY`] slots per subscriber.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Bus buffering `capacity` events per subscriber before it lags.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Receive events matching `filter` from now on.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(topics = ?filter.topics, "Subscribed to trace events");
        Subscription::new(self.sender.subscribe(), filter)
    }

    /// Same as [`subscribe`](Self::subscribe), as a `Stream`.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        self.subscribe(filter).into_stream()
    }

    /// Live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Events published since creation, delivered or not.
    #[must_use]
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// Per-subscriber buffer size.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: TraceEvent) -> usize {
        self.published.fetch_add(1, Ordering::Relaxed);
        let topic = event.topic();
        let key = event.entity_key();

        // send only fails when nobody is subscribed
        let receivers = self.sender.send(event).unwrap_or(0);
        debug!(
            topic = topic.as_str(),
            entity = %key,
            receivers,
            "Trace event published"
        );
        receivers
    }
}
