use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, instrument, warn};

use super::live_feed::{LiveFeed, LiveSubscription};
use super::push::{PushGateway, PushMessage};
use crate::domain::InventoryEvent;

#[derive(Debug)]
pub enum DispatchRequest {
    Push(PushMessage),
    Shutdown,
}

/// Delivery worker. Drains the push queue one message at a time, each
/// attempt bounded by `timeout`, and swallows every failure after logging it.
pub struct NotificationService {
    receiver: mpsc::Receiver<DispatchRequest>,
    gateway: Arc<dyn PushGateway>,
    timeout: Duration,
}

impl NotificationService {
    pub fn new(
        queue_size: usize,
        gateway: Arc<dyn PushGateway>,
        timeout: Duration,
        live_feed: LiveFeed,
    ) -> (Self, NotificationDispatcher) {
        let (sender, receiver) = mpsc::channel(queue_size.max(1));
        let service = Self {
            receiver,
            gateway,
            timeout,
        };
        let dispatcher = NotificationDispatcher { sender, live_feed };
        (service, dispatcher)
    }

    #[instrument(name = "notification_service", skip(self))]
    pub async fn run(mut self) {
        info!("NotificationService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                DispatchRequest::Push(message) => self.handle_push(message).await,
                DispatchRequest::Shutdown => {
                    info!("NotificationService shutting down");
                    break;
                }
            }
        }

        info!("NotificationService stopped");
    }

    #[instrument(fields(title = %message.title), skip(self, message))]
    async fn handle_push(&self, message: PushMessage) {
        match tokio::time::timeout(self.timeout, self.gateway.send(&message)).await {
            Ok(Ok(())) => info!("Push notification delivered"),
            Ok(Err(e)) => warn!(error = %e, "Push notification failed"),
            Err(_) => warn!(timeout_ms = self.timeout.as_millis() as u64, "Push notification timed out"),
        }
    }
}

/// Handle used by the orchestrators. Nothing here waits for delivery.
#[derive(Clone)]
pub struct NotificationDispatcher {
    sender: mpsc::Sender<DispatchRequest>,
    live_feed: LiveFeed,
}

impl NotificationDispatcher {
    /// Queues a push for `token`. A full or stopped queue drops the message.
    #[instrument(skip(self, token, body, data))]
    pub fn notify_user(&self, token: &str, title: &str, body: String, data: HashMap<String, String>) {
        let message = PushMessage {
            token: token.to_string(),
            title: title.to_string(),
            body,
            data,
        };
        match self.sender.try_send(DispatchRequest::Push(message)) {
            Ok(()) => debug!("Notification queued"),
            Err(TrySendError::Full(_)) => warn!("Notification queue full, dropping message"),
            Err(TrySendError::Closed(_)) => warn!("Notification service stopped, dropping message"),
        }
    }

    pub fn broadcast(&self, event: InventoryEvent) -> usize {
        self.live_feed.publish(event)
    }

    pub fn subscribe(&self) -> LiveSubscription {
        self.live_feed.subscribe()
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), String> {
        debug!("Sending shutdown request");
        self.sender
            .send(DispatchRequest::Shutdown)
            .await
            .map_err(|e| e.to_string())
    }
}
