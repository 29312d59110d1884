//! Address-scoped spam guard for pre-authentication code checks.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::errors::{CoreError, CoreResult};
use crate::repositories::SpamBlockRepository;

/// Gate for email code check attempts, keyed purely by the address so
/// the block survives across competing accounts
pub struct SpamGuard<S: SpamBlockRepository> {
    blocks: Arc<S>,
    window_seconds: i64,
}

impl<S: SpamBlockRepository> SpamGuard<S> {
    pub fn new(blocks: Arc<S>, window_seconds: i64) -> Self {
        Self {
            blocks,
            window_seconds,
        }
    }

    /// Allow one attempt per window. Allowing always starts a fresh
    /// block so the next attempt has to wait out the full window.
    pub async fn check(&self, address: &str, now: DateTime<Utc>) -> CoreResult<()> {
        if self
            .blocks
            .begin_window(address, now, self.window_seconds)
            .await?
        {
            return Ok(());
        }

        let seconds_remaining = self
            .blocks
            .time_remaining(address, now)
            .await?
            .unwrap_or(self.window_seconds);
        tracing::warn!(
            address = address,
            seconds_remaining = seconds_remaining,
            event = "spam_block_hit",
            "address-scoped throttle rejected a code check attempt"
        );
        Err(CoreError::Throttled { seconds_remaining })
    }
}
