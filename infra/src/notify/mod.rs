//! Notification dispatcher implementations.
//!
//! Delivery is best-effort by contract: callers log failures and never
//! couple their durability to it. Template rendering and the actual
//! mail/SMS transport live behind these types.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use vouch_core::services::notify::{Notification, NotificationDispatcher};

/// Dispatcher that records deliveries to the log only.
///
/// Stands in for the mail/SMS transport in development deployments.
#[derive(Default)]
pub struct TracingDispatcher;

#[async_trait]
impl NotificationDispatcher for TracingDispatcher {
    async fn dispatch(&self, notification: Notification) -> Result<(), String> {
        info!(
            template = ?notification.template,
            catalog_code = notification.catalog_code,
            recipient = ?notification.recipient,
            event = "notification_dispatched",
            "notification dispatched"
        );
        Ok(())
    }
}

/// Dispatcher that collects notifications in memory.
///
/// Used by the end-to-end tests to assert on delivery.
#[derive(Default)]
pub struct CollectingDispatcher {
    sent: Mutex<Vec<Notification>>,
}

impl CollectingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications dispatched so far
    pub async fn sent(&self) -> Vec<Notification> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl NotificationDispatcher for CollectingDispatcher {
    async fn dispatch(&self, notification: Notification) -> Result<(), String> {
        self.sent.lock().await.push(notification);
        Ok(())
    }
}
