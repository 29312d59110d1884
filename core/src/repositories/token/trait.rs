//! Verification token repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::verification_token::VerificationToken;
use crate::errors::CoreError;

/// Repository contract for [`VerificationToken`] persistence.
///
/// Expired tokens are inert but stay in the store: lookups match them,
/// and the caller decides what an expired match means. Nothing here
/// sweeps or filters by age.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Exact (address, code) lookup across all stored tokens.
    ///
    /// Expired tokens are matched too; expiry is checked by the caller.
    async fn find_by_address_and_code(
        &self,
        address: &str,
        code: &str,
    ) -> Result<Option<VerificationToken>, CoreError>;

    /// Whether any live (unexpired) token for the same address value
    /// already carries this code, excluding the given contact's own
    /// token. Used by the collision regeneration loop.
    async fn live_code_in_use(
        &self,
        address: &str,
        code: &str,
        exclude_contact: Uuid,
        now: DateTime<Utc>,
    ) -> Result<bool, CoreError>;

    /// Persist a new token
    async fn create(&self, token: VerificationToken) -> Result<VerificationToken, CoreError>;

    /// Delete a token by id, returning `false` if it did not exist
    async fn delete(&self, id: Uuid) -> Result<bool, CoreError>;

    /// Delete the token bound to a contact record, if any
    async fn delete_by_contact(&self, contact_id: Uuid) -> Result<bool, CoreError>;
}
