//! Account entity, the identity root of the Vouch system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default role tier for newly registered accounts
pub const TIER_DEFAULT: i32 = 0;

/// Role tier at or above which an account counts as admin
pub const TIER_ADMIN_THRESHOLD: i32 = 7;

/// Role tier of superuser accounts (skip contact validation)
pub const TIER_SUPERUSER: i32 = 9;

/// Ban reason codes, exposed through the API with an explanation.
pub mod ban {
    /// Active account sentinel
    pub const ACTIVE: i32 = 0;
    /// General block, no reason given
    pub const GENERAL: i32 = 1;
    /// Only associated contact was verified on another account
    pub const CONTACT_SUPERSEDED: i32 = 2;

    /// Internal explanation for a ban reason code
    pub fn describe(code: i32) -> Option<&'static str> {
        match code {
            ACTIVE => Some("This user account is active."),
            GENERAL => Some("General block, no reason given."),
            CONTACT_SUPERSEDED => Some(
                "Only associated contact address activated on another account. \
                 Please create a new account or login.",
            ),
            _ => None,
        }
    }
}

/// Account entity representing a registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for the account
    pub id: Uuid,

    /// Unique login handle
    pub username: String,

    /// Password hash (algorithm is the hasher's concern)
    pub password_hash: String,

    /// Role tier; tiers at or above [`TIER_ADMIN_THRESHOLD`] are admins
    pub tier: i32,

    /// Derived from `tier` by [`Account::normalize`], never set directly
    pub is_admin: bool,

    /// Whether the account is active (false = banned/deactivated)
    pub is_active: bool,

    /// Ban reason code; [`ban::ACTIVE`] while the account is active
    pub ban_reason: i32,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,

    /// Session invalidation watermark: bearer tokens minted before this
    /// instant are rejected
    pub last_logout_all: Option<DateTime<Utc>>,

    /// Earliest instant the next email verification request is allowed
    pub next_email_request: Option<DateTime<Utc>>,

    /// Earliest instant the next phone verification request is allowed
    pub next_phone_request: Option<DateTime<Utc>>,

    /// Earliest instant the next phone code check is allowed
    pub next_phone_code_request: Option<DateTime<Utc>>,
}

impl Account {
    /// Creates a new active account with the given handle and password hash
    pub fn new(username: String, password_hash: String, tier: i32) -> Self {
        let mut account = Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            tier,
            is_admin: false,
            is_active: true,
            ban_reason: ban::ACTIVE,
            created_at: Utc::now(),
            last_logout_all: None,
            next_email_request: None,
            next_phone_request: None,
            next_phone_code_request: None,
        };
        account.normalize();
        account
    }

    /// Recomputes derived fields. Must be invoked by every mutation path
    /// before persisting: `is_admin` follows the role tier, and the ban
    /// reason falls back to the active sentinel once the account is
    /// active again.
    pub fn normalize(&mut self) {
        self.is_admin = self.tier >= TIER_ADMIN_THRESHOLD;
        if self.is_active {
            self.ban_reason = ban::ACTIVE;
        }
    }

    /// Deactivates the account, recording the ban reason.
    /// Calling this repeatedly keeps the latest reason.
    pub fn deactivate(&mut self, reason: i32) {
        self.is_active = false;
        self.ban_reason = reason;
    }

    /// Reactivates the account; `normalize` resets the ban reason.
    pub fn reactivate(&mut self) {
        self.is_active = true;
        self.normalize();
    }

    /// Sets the logout-all watermark, invalidating sessions minted earlier
    pub fn revoke_sessions(&mut self, now: DateTime<Utc>) {
        self.last_logout_all = Some(now);
    }

    /// Checks if the account is a superuser
    pub fn is_superuser(&self) -> bool {
        self.tier == TIER_SUPERUSER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account::new("simon".to_string(), "$2b$12$hash".to_string(), TIER_DEFAULT)
    }

    #[test]
    fn test_new_account() {
        let account = account();
        assert!(account.is_active);
        assert!(!account.is_admin);
        assert_eq!(account.ban_reason, ban::ACTIVE);
        assert!(account.next_email_request.is_none());
    }

    #[test]
    fn test_is_admin_follows_tier() {
        let mut account = account();
        account.tier = 6;
        account.normalize();
        assert!(!account.is_admin);

        account.tier = 7;
        account.normalize();
        assert!(account.is_admin);

        account.tier = TIER_SUPERUSER;
        account.normalize();
        assert!(account.is_admin);
        assert!(account.is_superuser());
    }

    #[test]
    fn test_deactivate_keeps_latest_reason() {
        let mut account = account();
        account.deactivate(ban::GENERAL);
        account.normalize();
        assert!(!account.is_active);
        assert_eq!(account.ban_reason, ban::GENERAL);

        account.deactivate(ban::CONTACT_SUPERSEDED);
        account.normalize();
        assert_eq!(account.ban_reason, ban::CONTACT_SUPERSEDED);
    }

    #[test]
    fn test_reactivate_resets_reason() {
        let mut account = account();
        account.deactivate(ban::CONTACT_SUPERSEDED);
        account.reactivate();
        assert!(account.is_active);
        assert_eq!(account.ban_reason, ban::ACTIVE);
    }

    #[test]
    fn test_ban_code_catalog() {
        assert!(ban::describe(ban::ACTIVE).unwrap().contains("active"));
        assert!(ban::describe(ban::CONTACT_SUPERSEDED).unwrap().contains("another account"));
        assert_eq!(ban::describe(99), None);
    }
}
