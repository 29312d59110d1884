//! Mock implementation of SpamBlockRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::errors::CoreError;

use super::trait_::SpamBlockRepository;

/// Mock spam block repository backed by a hash map.
///
/// The single write lock makes the conditional upsert atomic across all
/// addresses, which is stricter than the per-address requirement.
#[derive(Default)]
pub struct MockSpamBlockRepository {
    blocks: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
}

impl MockSpamBlockRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SpamBlockRepository for MockSpamBlockRepository {
    async fn begin_window(
        &self,
        address: &str,
        now: DateTime<Utc>,
        window_seconds: i64,
    ) -> Result<bool, CoreError> {
        let mut blocks = self.blocks.write().await;
        match blocks.get(address) {
            Some(blocked_until) if now <= *blocked_until => Ok(false),
            _ => {
                blocks.insert(
                    address.to_string(),
                    now + Duration::seconds(window_seconds),
                );
                Ok(true)
            }
        }
    }

    async fn time_remaining(
        &self,
        address: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<i64>, CoreError> {
        let blocks = self.blocks.read().await;
        Ok(blocks
            .get(address)
            .map(|blocked_until| (*blocked_until - now).num_seconds())
            .filter(|remaining| *remaining > 0))
    }
}
