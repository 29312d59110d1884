//! Mock implementation of AccountRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::account::Account;
use crate::errors::{ConflictError, CoreError, NotFoundError};

use super::trait_::AccountRepository;

/// Mock account repository backed by a hash map
#[derive(Default)]
pub struct MockAccountRepository {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
}

impl MockAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for MockAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, CoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, CoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.username == username).cloned())
    }

    async fn create(&self, account: Account) -> Result<Account, CoreError> {
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.username == account.username) {
            return Err(ConflictError::UsernameTaken.into());
        }
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update(&self, account: Account) -> Result<Account, CoreError> {
        let mut accounts = self.accounts.write().await;
        if !accounts.contains_key(&account.id) {
            return Err(NotFoundError::AccountNotFound.into());
        }
        accounts.insert(account.id, account.clone());
        Ok(account)
    }
}
