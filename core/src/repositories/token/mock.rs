//! Mock implementation of TokenRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::verification_token::VerificationToken;
use crate::errors::CoreError;

use super::trait_::TokenRepository;

/// Mock verification token repository backed by a hash map
#[derive(Default)]
pub struct MockTokenRepository {
    tokens: Arc<RwLock<HashMap<Uuid, VerificationToken>>>,
}

impl MockTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, token: VerificationToken) {
        self.tokens.write().await.insert(token.id, token);
    }

    pub async fn all(&self) -> Vec<VerificationToken> {
        self.tokens.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl TokenRepository for MockTokenRepository {
    async fn find_by_address_and_code(
        &self,
        address: &str,
        code: &str,
    ) -> Result<Option<VerificationToken>, CoreError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .values()
            .find(|t| t.address == address && t.matches_code(code))
            .cloned())
    }

    async fn live_code_in_use(
        &self,
        address: &str,
        code: &str,
        exclude_contact: Uuid,
        now: DateTime<Utc>,
    ) -> Result<bool, CoreError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.values().any(|t| {
            t.address == address
                && t.contact_id != exclude_contact
                && !t.is_expired(now)
                && t.matches_code(code)
        }))
    }

    async fn create(&self, token: VerificationToken) -> Result<VerificationToken, CoreError> {
        let mut tokens = self.tokens.write().await;
        tokens.insert(token.id, token.clone());
        Ok(token)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, CoreError> {
        let mut tokens = self.tokens.write().await;
        Ok(tokens.remove(&id).is_some())
    }

    async fn delete_by_contact(&self, contact_id: Uuid) -> Result<bool, CoreError> {
        let mut tokens = self.tokens.write().await;
        let existing: Vec<Uuid> = tokens
            .values()
            .filter(|t| t.contact_id == contact_id)
            .map(|t| t.id)
            .collect();
        for id in &existing {
            tokens.remove(id);
        }
        Ok(!existing.is_empty())
    }
}
