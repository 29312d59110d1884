//! Token issuer implementation.

use chrono::Utc;
use std::sync::Arc;

use crate::domain::entities::account::Account;
use crate::domain::entities::contact::Contact;
use crate::domain::entities::verification_token::VerificationToken;
use crate::errors::{CoreResult, NotFoundError};
use crate::repositories::TokenRepository;

/// Creates, deduplicates and looks up one-time verification codes
pub struct TokenIssuer<T: TokenRepository> {
    tokens: Arc<T>,
}

impl<T: TokenRepository> TokenIssuer<T> {
    pub fn new(tokens: Arc<T>) -> Self {
        Self { tokens }
    }

    /// Issue a fresh token for a contact record.
    ///
    /// Any prior token for the contact is deleted first, so exactly one
    /// live token exists per record. The code regenerates until it is
    /// unique among live tokens sharing the address value; with a code
    /// space of 10^6 the loop practically never repeats, but it must
    /// loop, not merely retry once.
    pub async fn issue(&self, account: &Account, contact: &Contact) -> CoreResult<VerificationToken> {
        let now = Utc::now();
        self.tokens.delete_by_contact(contact.id).await?;

        let mut token = VerificationToken::new(account.id, contact.id, contact.address.clone());
        while self
            .tokens
            .live_code_in_use(&contact.address, &token.code, contact.id, now)
            .await?
        {
            token.regenerate_code();
        }

        let token = self.tokens.create(token).await?;
        tracing::info!(
            contact_id = %contact.id,
            account_id = %account.id,
            event = "verification_token_issued",
            "issued verification token"
        );
        Ok(token)
    }

    /// Exact (address, code) lookup. Expired tokens still match here;
    /// the caller owns the expiry decision.
    pub async fn validate(&self, address: &str, code: &str) -> CoreResult<VerificationToken> {
        self.tokens
            .find_by_address_and_code(address, code)
            .await?
            .ok_or_else(|| NotFoundError::NoVerificationMatch.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::account::TIER_DEFAULT;
    use crate::domain::entities::contact::ContactChannel;
    use crate::errors::CoreError;
    use crate::repositories::MockTokenRepository;
    use uuid::Uuid;

    fn fixtures() -> (Account, Contact) {
        let account = Account::new("simon".to_string(), "hash".to_string(), TIER_DEFAULT);
        let contact = Contact::new(
            account.id,
            ContactChannel::Email,
            "me@example.com".to_string(),
            true,
        );
        (account, contact)
    }

    #[tokio::test]
    async fn test_issue_replaces_prior_token() {
        let tokens = Arc::new(MockTokenRepository::new());
        let issuer = TokenIssuer::new(tokens.clone());
        let (account, contact) = fixtures();

        let first = issuer.issue(&account, &contact).await.unwrap();
        let second = issuer.issue(&account, &contact).await.unwrap();

        let stored = tokens.all().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, second.id);
        assert_ne!(stored[0].id, first.id);
    }

    #[tokio::test]
    async fn test_validate_matches_issued_token() {
        let tokens = Arc::new(MockTokenRepository::new());
        let issuer = TokenIssuer::new(tokens);
        let (account, contact) = fixtures();

        let token = issuer.issue(&account, &contact).await.unwrap();
        let found = issuer.validate("me@example.com", &token.code).await.unwrap();
        assert_eq!(found.id, token.id);
    }

    #[tokio::test]
    async fn test_validate_unknown_pair_is_not_found() {
        let tokens = Arc::new(MockTokenRepository::new());
        let issuer = TokenIssuer::new(tokens);

        let result = issuer.validate("me@example.com", "000000").await;
        assert!(matches!(
            result,
            Err(CoreError::NotFound(NotFoundError::NoVerificationMatch))
        ));
    }

    #[tokio::test]
    async fn test_validate_never_matches_replaced_token() {
        let tokens = Arc::new(MockTokenRepository::new());
        let issuer = TokenIssuer::new(tokens);
        let (account, contact) = fixtures();

        let first = issuer.issue(&account, &contact).await.unwrap();
        let second = issuer.issue(&account, &contact).await.unwrap();

        if first.code != second.code {
            assert!(issuer.validate("me@example.com", &first.code).await.is_err());
        }
        assert!(issuer.validate("me@example.com", &second.code).await.is_ok());
    }

    #[tokio::test]
    async fn test_collision_regenerates_code() {
        let tokens = Arc::new(MockTokenRepository::new());
        let issuer = TokenIssuer::new(tokens.clone());
        let (account, contact) = fixtures();

        // A live token on another contact with the same address occupies
        // one code out of the space.
        let other = VerificationToken::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "me@example.com".to_string(),
        );
        let occupied = other.code.clone();
        tokens.insert(other).await;

        let token = issuer.issue(&account, &contact).await.unwrap();
        assert_ne!(token.code, occupied);
    }
}
