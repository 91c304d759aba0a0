//! Broadcast bus for registry events.

use crate::session::RegistryEvent;
use tokio::sync::broadcast;

/// Fan-out bus for [`RegistryEvent`]s.
///
/// Publishing is fire-and-forget: a publish with no live subscribers (or
/// with lagging subscribers) never fails the mutation that triggered it.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<RegistryEvent>,
}

impl EventBus {
    /// Creates a bus retaining up to `capacity` undelivered events per
    /// subscriber before older ones are dropped.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to all events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.sender.subscribe()
    }

    /// Publishes an event to all current subscribers.
    pub fn publish(&self, event: RegistryEvent) {
        // send only errors when there are no receivers; that is fine
        let _ = self.sender.send(event);
    }

    /// Number of live subscribers (diagnostics only).
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
