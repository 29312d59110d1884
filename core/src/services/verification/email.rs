//! Email verification flow.

use chrono::Utc;
use std::sync::Arc;

use vouch_shared::utils::validation;

use crate::domain::entities::account::Account;
use crate::domain::entities::contact::{Contact, ContactChannel};
use crate::errors::{ConflictError, CoreResult, NotFoundError, ValidationError};
use crate::repositories::{
    AccountRepository, ContactRepository, SpamBlockRepository, TokenRepository,
};
use crate::services::issuer::TokenIssuer;
use crate::services::notify::{Notification, NotificationDispatcher};
use crate::services::resolver::VerificationResolver;
use crate::services::throttle::{self, SpamGuard};

use super::config::VerificationConfig;
use super::types::{EmailTarget, RequestCodeResult};

/// Email verification flow: token issuance requests and code submission
pub struct EmailVerificationService<A, C, T, S, N>
where
    A: AccountRepository,
    C: ContactRepository,
    T: TokenRepository,
    S: SpamBlockRepository,
    N: NotificationDispatcher,
{
    accounts: Arc<A>,
    contacts: Arc<C>,
    issuer: Arc<TokenIssuer<T>>,
    spam_guard: Arc<SpamGuard<S>>,
    resolver: Arc<VerificationResolver<A, C, T, N>>,
    dispatcher: Arc<N>,
    config: VerificationConfig,
}

impl<A, C, T, S, N> EmailVerificationService<A, C, T, S, N>
where
    A: AccountRepository,
    C: ContactRepository,
    T: TokenRepository,
    S: SpamBlockRepository,
    N: NotificationDispatcher,
{
    pub fn new(
        accounts: Arc<A>,
        contacts: Arc<C>,
        issuer: Arc<TokenIssuer<T>>,
        spam_guard: Arc<SpamGuard<S>>,
        resolver: Arc<VerificationResolver<A, C, T, N>>,
        dispatcher: Arc<N>,
        config: VerificationConfig,
    ) -> Self {
        Self {
            accounts,
            contacts,
            issuer,
            spam_guard,
            resolver,
            dispatcher,
            config,
        }
    }

    /// Request a verification code for an email address.
    ///
    /// Either adds a new unverified claim to the account, or re-requests
    /// a code for an existing unverified record. Issuing replaces any
    /// prior token, mails the fresh code, and arms the account's email
    /// gate for the full request window.
    pub async fn request(
        &self,
        account: &Account,
        target: EmailTarget,
    ) -> CoreResult<RequestCodeResult> {
        let now = Utc::now();
        let mut account = account.clone();

        // Resolve the target up front; new addresses stay unclaimed
        // until every gate has passed.
        let mut contact: Option<Contact> = None;
        let address = match target {
            EmailTarget::ContactId(id) => {
                let found = self
                    .contacts
                    .find_by_id(id)
                    .await?
                    .filter(|c| {
                        c.account_id == account.id
                            && c.channel == ContactChannel::Email
                            && !c.verified
                    })
                    .ok_or(NotFoundError::ContactNotFound)?;
                let address = found.address.clone();
                contact = Some(found);
                address
            }
            EmailTarget::Address(raw) => {
                let normalized = validation::normalize_email(&raw);
                if !validation::is_valid_email(&normalized) {
                    return Err(ValidationError::InvalidEmail.into());
                }
                if let Some(own) = self
                    .contacts
                    .find_by_account_and_address(account.id, ContactChannel::Email, &normalized)
                    .await?
                {
                    if own.verified {
                        return Err(ConflictError::AlreadyVerifiedOnAccount.into());
                    }
                    contact = Some(own);
                }
                normalized
            }
        };

        throttle::gate(account.next_email_request, now)?;

        let contact = match contact {
            Some(existing) => existing,
            None => {
                // New address: a claim verified anywhere blocks it, and
                // the rejection still arms the conflict window.
                if self
                    .contacts
                    .find_verified_by_address(ContactChannel::Email, &address)
                    .await?
                    .is_some()
                {
                    account.next_email_request =
                        Some(throttle::arm(now, self.config.windows.email_conflict_seconds));
                    account.normalize();
                    self.accounts.update(account).await?;
                    return Err(ConflictError::VerifiedOnOtherAccount.into());
                }
                self.contacts
                    .create(Contact::new(
                        account.id,
                        ContactChannel::Email,
                        address.clone(),
                        false,
                    ))
                    .await?
            }
        };

        let token = self.issuer.issue(&account, &contact).await?;
        if let Err(e) = self
            .dispatcher
            .dispatch(Notification::verification_code(&contact.address, &token))
            .await
        {
            tracing::warn!(
                contact_id = %contact.id,
                error = %e,
                event = "notification_failed",
                "best-effort verification mail failed"
            );
        }

        let next_request_at = throttle::arm(now, self.config.windows.email_request_seconds);
        account.next_email_request = Some(next_request_at);
        account.normalize();
        self.accounts.update(account).await?;

        Ok(RequestCodeResult {
            contact,
            next_request_at,
        })
    }

    /// Submit a verification code for an email address.
    ///
    /// Unauthenticated by design: verification links are opened on any
    /// device. A matched-but-expired token fails without being deleted;
    /// a fresh request will replace it.
    pub async fn submit(&self, address: &str, code: &str) -> CoreResult<Contact> {
        let now = Utc::now();

        let normalized = validation::normalize_email(address);
        if !validation::is_valid_email(&normalized) {
            return Err(ValidationError::InvalidEmail.into());
        }
        if !validation::is_valid_verification_code(code) {
            return Err(ValidationError::InvalidCodeFormat.into());
        }

        // Address-scoped gate: applies before authentication and across
        // whichever accounts compete for the address.
        self.spam_guard.check(&normalized, now).await?;

        let token = self.issuer.validate(&normalized, code).await?;

        // Re-arm the owner's email gate on every submission, the expiry
        // failure path included.
        if let Some(mut owner) = self.accounts.find_by_id(token.account_id).await? {
            owner.next_email_request =
                Some(throttle::arm(now, self.config.windows.email_submit_rearm_seconds));
            owner.normalize();
            self.accounts.update(owner).await?;
        }

        if token.is_expired(now) {
            tracing::info!(
                contact_id = %token.contact_id,
                event = "verification_token_expired",
                "matched token was past its lifetime"
            );
            return Err(ConflictError::CodeExpired.into());
        }

        let contact = self
            .contacts
            .find_by_id(token.contact_id)
            .await?
            .ok_or(NotFoundError::ContactNotFound)?;

        self.resolver.resolve(contact, Some(&token)).await
    }
}
