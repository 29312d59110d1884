//! Mock implementation of ContactRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::contact::{Contact, ContactChannel};
use crate::errors::{CoreError, NotFoundError};

use super::trait_::ContactRepository;

/// Mock contact repository backed by a hash map
#[derive(Default)]
pub struct MockContactRepository {
    contacts: Arc<RwLock<HashMap<Uuid, Contact>>>,
}

impl MockContactRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, contact: Contact) {
        self.contacts.write().await.insert(contact.id, contact);
    }

    pub async fn all(&self) -> Vec<Contact> {
        self.contacts.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl ContactRepository for MockContactRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Contact>, CoreError> {
        let contacts = self.contacts.read().await;
        Ok(contacts.get(&id).cloned())
    }

    async fn find_by_account_and_address(
        &self,
        account_id: Uuid,
        channel: ContactChannel,
        address: &str,
    ) -> Result<Option<Contact>, CoreError> {
        let contacts = self.contacts.read().await;
        Ok(contacts
            .values()
            .find(|c| c.account_id == account_id && c.channel == channel && c.address == address)
            .cloned())
    }

    async fn find_verified_by_address(
        &self,
        channel: ContactChannel,
        address: &str,
    ) -> Result<Option<Contact>, CoreError> {
        let contacts = self.contacts.read().await;
        Ok(contacts
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
        let contacts = self.contacts.read().await;
        Ok(contacts
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
        let contacts = self.contacts.read().await;
        Ok(contacts
            .values()
            .find(|c| c.account_id == account_id && c.channel == channel && c.primary)
            .cloned())
    }

    async fn count_by_account_and_channel(
        &self,
        account_id: Uuid,
        channel: ContactChannel,
    ) -> Result<u64, CoreError> {
        let contacts = self.contacts.read().await;
        Ok(contacts
            .values()
            .filter(|c| c.account_id == account_id && c.channel == channel)
            .count() as u64)
    }

    async fn create(&self, contact: Contact) -> Result<Contact, CoreError> {
        let mut contacts = self.contacts.write().await;
        contacts.insert(contact.id, contact.clone());
        Ok(contact)
    }

    async fn update(&self, contact: Contact) -> Result<Contact, CoreError> {
        let mut contacts = self.contacts.write().await;
        if !contacts.contains_key(&contact.id) {
            return Err(NotFoundError::ContactNotFound.into());
        }
        contacts.insert(contact.id, contact.clone());
        Ok(contact)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, CoreError> {
        let mut contacts = self.contacts.write().await;
        Ok(contacts.remove(&id).is_some())
    }
}
