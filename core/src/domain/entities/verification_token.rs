//! Verification token entity: a one-time 6-digit code bound to a contact record.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Seconds after creation at which a token expires
pub const TOKEN_TTL_SECONDS: i64 = 600;

/// One-time verification code bound to a contact record.
///
/// Exactly one live token exists per contact record; issuing a new one
/// replaces the old. Expired tokens stay in the store and still match on
/// lookup, but a matched-and-expired token is a verification failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationToken {
    /// Unique identifier for the token
    pub id: Uuid,

    /// Contact record this token verifies
    pub contact_id: Uuid,

    /// Account owning the contact record
    pub account_id: Uuid,

    /// Address value of the contact, denormalized for lookup
    pub address: String,

    /// The zero-padded 6-digit numeric code
    pub code: String,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,
}

impl VerificationToken {
    /// Creates a new token with a freshly generated random code
    pub fn new(account_id: Uuid, contact_id: Uuid, address: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            contact_id,
            account_id,
            address,
            code: Self::generate_code(),
            created_at: Utc::now(),
        }
    }

    /// Generates a random zero-padded 6-digit numeric code
    pub fn generate_code() -> String {
        let mut rng = rand::thread_rng();
        let code: u32 = rng.gen_range(0..1_000_000);
        format!("{:06}", code)
    }

    /// Replaces the code with a fresh one (collision regeneration)
    pub fn regenerate_code(&mut self) {
        self.code = Self::generate_code();
    }

    /// Checks whether the token has expired at the given instant
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at >= Duration::seconds(TOKEN_TTL_SECONDS)
    }

    /// Constant-time comparison against a submitted code
    pub fn matches_code(&self, code: &str) -> bool {
        self.code.len() == code.len() && constant_time_eq(self.code.as_bytes(), code.as_bytes())
    }
}
