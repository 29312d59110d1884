//! Session token collaborator seam.
//!
//! The core never mints or parses bearer tokens itself; it hands the
//! authenticated account to this trait and consumes the result. The
//! account's `last_logout_all` watermark is the only session state the
//! core owns: implementations must reject access tokens minted before
//! it.

use async_trait::async_trait;

use crate::domain::entities::account::Account;
use crate::domain::value_objects::session::{SessionClaims, SessionPair};
use crate::errors::CoreResult;

/// Trait for bearer credential issuance and verification
#[async_trait]
pub trait SessionTokenService: Send + Sync {
    /// Issue a fresh credential pair for an authenticated account
    async fn issue(&self, account: &Account) -> CoreResult<SessionPair>;

    /// Verify an access token against the account it claims to belong
    /// to, honoring the logout-all watermark
    async fn verify_access(&self, token: &str, account: &Account) -> CoreResult<SessionClaims>;
}
