//! Contact record entity: an email address or phone number owned by an account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Channel a contact record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactChannel {
    /// An email address
    Email,
    /// A phone number
    Phone,
}

/// A single email address or phone number claim.
///
/// Claims start unverified; the verification resolver is the only path
/// that flips `verified`. At most one verified record per address value
/// may exist system-wide, and at most one primary record per channel
/// per account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Unique identifier for the contact record
    pub id: Uuid,

    /// Owning account
    pub account_id: Uuid,

    /// Channel of this record
    pub channel: ContactChannel,

    /// Normalized address value (emails lowercased, phones E.164)
    pub address: String,

    /// Whether ownership of the address has been proven
    pub verified: bool,

    /// Whether this is the account's primary contact for the channel
    pub primary: bool,

    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,
}

impl Contact {
    /// Creates a new unverified contact record
    pub fn new(account_id: Uuid, channel: ContactChannel, address: String, primary: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            channel,
            address,
            verified: false,
            primary,
            created_at: Utc::now(),
        }
    }

    /// Marks the contact as verified
    pub fn verify(&mut self) {
        self.verified = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_contact() {
        let account_id = Uuid::new_v4();
        let contact = Contact::new(
            account_id,
            ContactChannel::Email,
            "me@example.com".to_string(),
            true,
        );

        assert_eq!(contact.account_id, account_id);
        assert_eq!(contact.channel, ContactChannel::Email);
        assert!(!contact.verified);
        assert!(contact.primary);
    }

    #[test]
    fn test_verify() {
        let mut contact = Contact::new(
            Uuid::new_v4(),
            ContactChannel::Phone,
            "+436601234567".to_string(),
            false,
        );
        contact.verify();
        assert!(contact.verified);
    }

    #[test]
    fn test_channel_serialization() {
        assert_eq!(serde_json::to_string(&ContactChannel::Email).unwrap(), "\"email\"");
        assert_eq!(serde_json::to_string(&ContactChannel::Phone).unwrap(), "\"phone\"");
    }
}
