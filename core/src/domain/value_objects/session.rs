//! Session value objects returned by the session token collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bearer credential pair issued after successful authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPair {
    /// Short-lived access token
    pub access_token: String,

    /// Long-lived refresh token
    pub refresh_token: String,

    /// Expiry of the access token
    pub access_expires_at: DateTime<Utc>,
}

/// Claims extracted from a verified access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Account the session belongs to
    pub account_id: Uuid,

    /// Instant the token was minted; compared against the account's
    /// logout-all watermark
    pub issued_at: DateTime<Utc>,

    /// Instant the token expires
    pub expires_at: DateTime<Utc>,
}
