//! Review progress events — decoupled visibility into a running loop.
//!
//! The loop controller publishes an event at each interesting transition.
//! Callers that want progress (a CLI spinner, a test asserting the action
//! sequence) subscribe; callers that only want the final report ignore it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// All progress events emitted during a review run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReviewEvent {
    /// The decision step returned a message
    DecisionMade {
        iteration: u32,
        requested_actions: usize,
        timestamp: DateTime<Utc>,
    },

    /// An action finished executing
    ActionExecuted {
        action: String,
        success: bool,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// The result router wrote a shared state slot
    SlotFilled {
        slot: String,
        action: String,
        timestamp: DateTime<Utc>,
    },

    /// The run reached its terminal state with a final report
    ReviewCompleted {
        iterations: u32,
        actions_executed: usize,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for review events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub. Publishing
/// with no subscribers is fine; events are simply dropped.
pub struct EventBus {
    sender: broadcast::Sender<Arc<ReviewEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: ReviewEvent) {
        // Ignore send errors (no subscribers = that's fine)
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<ReviewEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
