//! In-memory store implementing every repository trait.
//!
//! Backs development setups and the end-to-end tests. A single write
//! lock over the whole state provides row-level atomicity and makes the
//! spam-block conditional upsert atomic per address, which satisfies
//! the serialization contract of the repository traits.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use vouch_core::domain::entities::account::Account;
use vouch_core::domain::entities::contact::{Contact, ContactChannel};
use vouch_core::domain::entities::verification_token::VerificationToken;
use vouch_core::errors::{ConflictError, CoreError, NotFoundError};
use vouch_core::repositories::{
    AccountRepository, ContactRepository, SpamBlockRepository, TokenRepository,
};

#[derive(Default)]
struct StoreState {
    accounts: HashMap<Uuid, Account>,
    contacts: HashMap<Uuid, Contact>,
    tokens: HashMap<Uuid, VerificationToken>,
    spam_blocks: HashMap<String, DateTime<Utc>>,
}

/// In-memory durable store
#[derive(Default, Clone)]
pub struct MemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all contact records, for inspection in tests
    pub async fn contacts_snapshot(&self) -> Vec<Contact> {
        self.state.read().await.contacts.values().cloned().collect()
    }

    /// Snapshot of all verification tokens, for inspection in tests
    pub async fn tokens_snapshot(&self) -> Vec<VerificationToken> {
        self.state.read().await.tokens.values().cloned().collect()
    }
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, CoreError> {
        Ok(self.state.read().await.accounts.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, CoreError> {
        let state = self.state.read().await;
        Ok(state
            .accounts
            .values()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn create(&self, account: Account) -> Result<Account, CoreError> {
        let mut state = self.state.write().await;
        if state
            .accounts
            .values()
            .any(|a| a.username == account.username)
        {
            return Err(ConflictError::UsernameTaken.into());
        }
        state.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update(&self, account: Account) -> Result<Account, CoreError> {
        let mut state = self.state.write().await;
        if !state.accounts.contains_key(&account.id) {
            return Err(NotFoundError::AccountNotFound.into());
        }
        state.accounts.insert(account.id, account.clone());
        Ok(account)
    }
}

#[async_trait]
impl ContactRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Contact>, CoreError> {
        Ok(self.state.read().await.contacts.get(&id).cloned())
    }

    async fn find_by_account_and_address(
        &self,
        account_id: Uuid,
        channel: ContactChannel,
        address: &str,
    ) -> Result<Option<Contact>, CoreError> {
        let state = self.state.read().await;
        Ok(state
            .contacts
            .values()
            .find(|c| c.account_id == account_id && c.channel == channel && c.address == address)
            .cloned())
    }

    async fn find_verified_by_address(
        &self,
        channel: ContactChannel,
        address: &str,
    ) -> Result<Option<Contact>, CoreError> {
        let state = self.state.read().await;
        Ok(state
            .contacts
            .values()
            .find(|c| c.channel == channel && c.address == address && c.verified)
            .cloned())
    }

    async fn find_unverified_claims(
        &self,
        channel: ContactChannel,
        address: &str,
        exclude_account: Uuid,
    ) -> Result<Vec<Contact>, CoreError> {
        let state = self.state.read().await;
        Ok(state
            .contacts
            .values()
            .filter(|c| {
                c.channel == channel
                    && c.address == address
                    && !c.verified
                    && c.account_id != exclude_account
            })
            .cloned()
            .collect())
    }

    async fn find_primary(
        &self,
        account_id: Uuid,
        channel: ContactChannel,
    ) -> Result<Option<Contact>, CoreError> {
        let state = self.state.read().await;
        Ok(state
            .contacts
            .values()
            .find(|c| c.account_id == account_id && c.channel == channel && c.primary)
            .cloned())
    }

    async fn count_by_account_and_channel(
        &self,
        account_id: Uuid,
        channel: ContactChannel,
    ) -> Result<u64, CoreError> {
        let state = self.state.read().await;
        Ok(state
            .contacts
            .values()
            .filter(|c| c.account_id == account_id && c.channel == channel)
            .count() as u64)
    }

    async fn create(&self, contact: Contact) -> Result<Contact, CoreError> {
        let mut state = self.state.write().await;
        state.contacts.insert(contact.id, contact.clone());
        Ok(contact)
    }

    async fn update(&self, contact: Contact) -> Result<Contact, CoreError> {
        let mut state = self.state.write().await;
        if !state.contacts.contains_key(&contact.id) {
            return Err(NotFoundError::ContactNotFound.into());
        }
        state.contacts.insert(contact.id, contact.clone());
        Ok(contact)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, CoreError> {
        let mut state = self.state.write().await;
        Ok(state.contacts.remove(&id).is_some())
    }
}

#[async_trait]
impl TokenRepository for MemoryStore {
    async fn find_by_address_and_code(
        &self,
        address: &str,
        code: &str,
    ) -> Result<Option<VerificationToken>, CoreError> {
        let state = self.state.read().await;
        Ok(state
            .tokens
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
        let state = self.state.read().await;
        Ok(state.tokens.values().any(|t| {
            t.address == address
                && t.contact_id != exclude_contact
                && !t.is_expired(now)
                && t.matches_code(code)
        }))
    }

    async fn create(&self, token: VerificationToken) -> Result<VerificationToken, CoreError> {
        let mut state = self.state.write().await;
        state.tokens.insert(token.id, token.clone());
        Ok(token)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, CoreError> {
        let mut state = self.state.write().await;
        Ok(state.tokens.remove(&id).is_some())
    }

    async fn delete_by_contact(&self, contact_id: Uuid) -> Result<bool, CoreError> {
        let mut state = self.state.write().await;
        let ids: Vec<Uuid> = state
            .tokens
            .values()
            .filter(|t| t.contact_id == contact_id)
            .map(|t| t.id)
            .collect();
        for id in &ids {
            state.tokens.remove(id);
        }
        Ok(!ids.is_empty())
    }
}

#[async_trait]
impl SpamBlockRepository for MemoryStore {
    async fn begin_window(
        &self,
        address: &str,
        now: DateTime<Utc>,
        window_seconds: i64,
    ) -> Result<bool, CoreError> {
        // Holding the write lock across check and insert keeps the
        // upsert atomic per address.
        let mut state = self.state.write().await;
        match state.spam_blocks.get(address) {
            Some(blocked_until) if now <= *blocked_until => Ok(false),
            _ => {
                state
                    .spam_blocks
                    .insert(address.to_string(), now + Duration::seconds(window_seconds));
                Ok(true)
            }
        }
    }

    async fn time_remaining(
        &self,
        address: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<i64>, CoreError> {
        let state = self.state.read().await;
        Ok(state
            .spam_blocks
            .get(address)
            .map(|blocked_until| (*blocked_until - now).num_seconds())
            .filter(|remaining| *remaining > 0))
    }
}
