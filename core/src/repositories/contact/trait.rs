//! Contact repository trait defining the interface for contact record persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::contact::{Contact, ContactChannel};
use crate::errors::CoreError;

/// Repository contract for [`Contact`] persistence
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Find a contact record by its unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Contact>, CoreError>;

    /// Find the record a given account holds for an address, if any
    async fn find_by_account_and_address(
        &self,
        account_id: Uuid,
        channel: ContactChannel,
        address: &str,
    ) -> Result<Option<Contact>, CoreError>;

    /// Find the system-wide verified record for an address value.
    ///
    /// At most one such record exists; the verification resolver is the
    /// only writer that can create it.
    async fn find_verified_by_address(
        &self,
        channel: ContactChannel,
        address: &str,
    ) -> Result<Option<Contact>, CoreError>;

    /// All unverified records for the given address value held by
    /// accounts other than `exclude_account`.
    ///
    /// This is the single explicit query the resolver uses to collect
    /// competing claims; callers must run it inside the same per-address
    /// critical section as the deletions that follow.
    async fn find_unverified_claims(
        &self,
        channel: ContactChannel,
        address: &str,
        exclude_account: Uuid,
    ) -> Result<Vec<Contact>, CoreError>;

    /// Find the account's primary record of a channel, if any
    async fn find_primary(
        &self,
        account_id: Uuid,
        channel: ContactChannel,
    ) -> Result<Option<Contact>, CoreError>;

    /// Number of records the account holds for a channel
    async fn count_by_account_and_channel(
        &self,
        account_id: Uuid,
        channel: ContactChannel,
    ) -> Result<u64, CoreError>;

    /// Persist a new contact record
    async fn create(&self, contact: Contact) -> Result<Contact, CoreError>;

    /// Persist an updated contact record
    async fn update(&self, contact: Contact) -> Result<Contact, CoreError>;

    /// Delete a contact record
    ///
    /// Returns `false` if no record existed.
    async fn delete(&self, id: Uuid) -> Result<bool, CoreError>;
}
