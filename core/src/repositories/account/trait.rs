//! Account repository trait defining the interface for account persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::account::Account;
use crate::errors::CoreError;

/// Repository contract for [`Account`] persistence.
///
/// Implementations must provide row-level atomicity for individual
/// account updates; no further per-account serialization is required.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by its unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, CoreError>;

    /// Find an account by its unique login handle
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, CoreError>;

    /// Persist a new account
    ///
    /// Fails with a conflict if the username is already taken.
    async fn create(&self, account: Account) -> Result<Account, CoreError>;

    /// Persist an updated account
    async fn update(&self, account: Account) -> Result<Account, CoreError>;
}
