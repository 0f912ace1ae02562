use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::{debug, warn};

use crate::domain::InventoryEvent;

/// Live inventory channel for dashboard viewers.
///
/// Backed by a bounded broadcast ring: publishing never waits on a reader, a
/// reader that falls more than `capacity` events behind loses the oldest ones,
/// and events are not kept for subscribers that join later.
#[derive(Debug, Clone)]
pub struct LiveFeed {
    sender: broadcast::Sender<InventoryEvent>,
}

impl LiveFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Returns how many subscribers the event was handed to.
    pub fn publish(&self, event: InventoryEvent) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(receivers, "Inventory event broadcast");
                receivers
            }
            Err(_) => {
                debug!("No live subscribers, inventory event dropped");
                0
            }
        }
    }

    /// Dropping the returned subscription unsubscribes.
    pub fn subscribe(&self) -> LiveSubscription {
        LiveSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

pub struct LiveSubscription {
    receiver: broadcast::Receiver<InventoryEvent>,
}

impl LiveSubscription {
    /// Next event, skipping past anything lost to lag. `None` once the feed
    /// is gone.
    pub async fn next(&mut self) -> Option<InventoryEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Live subscriber lagging, events dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant of [`next`](Self::next). `None` when nothing is queued.
    pub fn try_next(&mut self) -> Option<InventoryEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Live subscriber lagging, events dropped");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}
