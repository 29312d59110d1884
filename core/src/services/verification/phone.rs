//! Phone verification flow.
//!
//! Codes for phone numbers are generated, delivered and matched by the
//! external provider; the core owns claim records, throttling and the
//! conflict resolution that follows an approval.

use chrono::Utc;
use std::sync::Arc;

use vouch_shared::utils::phone::{is_valid_phone, mask_phone_number, normalize_phone_number};
use vouch_shared::utils::validation::is_valid_verification_code;

use crate::domain::entities::account::Account;
use crate::domain::entities::contact::{Contact, ContactChannel};
use crate::errors::{ConflictError, CoreError, CoreResult, NotFoundError, ValidationError};
use crate::repositories::{AccountRepository, ContactRepository, TokenRepository};
use crate::services::notify::NotificationDispatcher;
use crate::services::resolver::VerificationResolver;
use crate::services::throttle;

use super::config::VerificationConfig;
use super::traits::{provider_codes, ProviderStatus, SmsChannel, SmsVerifyProvider};
use super::types::RequestCodeResult;

/// Phone verification flow: provider sends and code checks
pub struct PhoneVerificationService<A, C, T, N, P>
where
    A: AccountRepository,
    C: ContactRepository,
    T: TokenRepository,
    N: NotificationDispatcher,
    P: SmsVerifyProvider,
{
    accounts: Arc<A>,
    contacts: Arc<C>,
    resolver: Arc<VerificationResolver<A, C, T, N>>,
    provider: Arc<P>,
    config: VerificationConfig,
}

impl<A, C, T, N, P> PhoneVerificationService<A, C, T, N, P>
where
    A: AccountRepository,
    C: ContactRepository,
    T: TokenRepository,
    N: NotificationDispatcher,
    P: SmsVerifyProvider,
{
    pub fn new(
        accounts: Arc<A>,
        contacts: Arc<C>,
        resolver: Arc<VerificationResolver<A, C, T, N>>,
        provider: Arc<P>,
        config: VerificationConfig,
    ) -> Self {
        Self {
            accounts,
            contacts,
            resolver,
            provider,
            config,
        }
    }

    /// Associate a phone number with the account and have the provider
    /// send a verification code over the requested channel.
    pub async fn request(
        &self,
        account: &Account,
        number: &str,
        channel: SmsChannel,
    ) -> CoreResult<RequestCodeResult> {
        let now = Utc::now();
        let mut account = account.clone();

        let number = normalize_phone_number(number);
        if !is_valid_phone(&number) {
            return Err(ValidationError::InvalidPhone {
                number: mask_phone_number(&number),
            }
            .into());
        }

        // Inside the gate window the caller gets a precise answer: a
        // verified own number is a conflict either way, an unverified
        // own number means "reuse the code you received or wait".
        if let Some(seconds_remaining) =
            throttle::seconds_remaining(account.next_phone_request, now)
        {
            if let Some(own) = self
                .contacts
                .find_by_account_and_address(account.id, ContactChannel::Phone, &number)
                .await?
            {
                if own.verified {
                    return Err(ConflictError::AlreadyVerifiedOnAccount.into());
                }
            }
            return Err(CoreError::Throttled { seconds_remaining });
        }

        // Duplicate detection: a verified record anywhere blocks the
        // request and arms the short conflict window.
        if let Some(existing) = self
            .contacts
            .find_verified_by_address(ContactChannel::Phone, &number)
            .await?
        {
            let is_same_account = existing.account_id == account.id;
            account.next_phone_request =
                Some(throttle::arm(now, self.config.windows.phone_conflict_seconds));
            account.normalize();
            self.accounts.update(account).await?;
            return Err(if is_same_account {
                ConflictError::AlreadyVerifiedOnAccount.into()
            } else {
                ConflictError::VerifiedOnOtherAccount.into()
            });
        }

        let contact = match self
            .contacts
            .find_by_account_and_address(account.id, ContactChannel::Phone, &number)
            .await?
        {
            Some(existing) => existing,
            None => {
                self.contacts
                    .create(Contact::new(
                        account.id,
                        ContactChannel::Phone,
                        number.clone(),
                        false,
                    ))
                    .await?
            }
        };

        let next_request_at = throttle::arm(now, self.config.windows.phone_request_seconds);
        account.next_phone_request = Some(next_request_at);
        account.normalize();
        self.accounts.update(account).await?;

        match self.provider.send_code(&number, channel).await? {
            ProviderStatus::Failed { code } => {
                let message = if code == provider_codes::MAX_SEND_ATTEMPTS {
                    "max send attempts reached".to_string()
                } else {
                    "verification send rejected by provider".to_string()
                };
                Err(CoreError::Upstream { code, message })
            }
            _ => {
                tracing::info!(
                    contact_id = %contact.id,
                    number = %mask_phone_number(&number),
                    channel = channel.as_str(),
                    event = "phone_code_sent",
                    "provider accepted verification send"
                );
                Ok(RequestCodeResult {
                    contact,
                    next_request_at,
                })
            }
        }
    }

    /// Check a code the user received for the number.
    ///
    /// The code-check gate is armed before the provider call and stays
    /// armed regardless of the outcome.
    pub async fn submit(&self, account: &Account, number: &str, code: &str) -> CoreResult<Contact> {
        let now = Utc::now();
        let mut account = account.clone();

        let number = normalize_phone_number(number);
        if !is_valid_phone(&number) {
            return Err(ValidationError::InvalidPhone {
                number: mask_phone_number(&number),
            }
            .into());
        }
        if !is_valid_verification_code(code) {
            return Err(ValidationError::InvalidCodeFormat.into());
        }

        throttle::gate(account.next_phone_code_request, now)?;

        let contact = match self
            .contacts
            .find_by_account_and_address(account.id, ContactChannel::Phone, &number)
            .await?
        {
            Some(own) if own.verified => {
                return Err(ConflictError::AlreadyVerifiedOnAccount.into());
            }
            Some(own) => own,
            // Happens only with manipulated requests, never through the UI
            None => return Err(NotFoundError::ContactNotFound.into()),
        };

        // Backup check: normally all competing unverified claims are
        // deleted when a number gets verified, so this cannot match.
        if self
            .contacts
            .find_verified_by_address(ContactChannel::Phone, &number)
            .await?
            .is_some()
        {
            return Err(ConflictError::VerifiedOnOtherAccount.into());
        }

        account.next_phone_code_request =
            Some(throttle::arm(now, self.config.windows.phone_check_seconds));
        account.normalize();
        let mut account = self.accounts.update(account).await?;

        match self.provider.check_code(&number, code).await? {
            ProviderStatus::Approved => {
                let contact = self.resolver.resolve(contact, None).await?;

                // A fresh number can be added right away.
                account.next_phone_request = Some(throttle::arm(
                    Utc::now(),
                    self.config.windows.phone_verified_rearm_seconds,
                ));
                account.normalize();
                self.accounts.update(account).await?;

                Ok(contact)
            }
            ProviderStatus::Pending => Err(NotFoundError::CodeMismatch.into()),
            ProviderStatus::Failed { code } => {
                let message = match code {
                    provider_codes::VERIFICATION_NOT_FOUND => {
                        "no verification process found for this number; the code may be \
                         expired, already used, or the process was never started"
                            .to_string()
                    }
                    provider_codes::MAX_CHECK_ATTEMPTS => "max check attempts reached".to_string(),
                    _ => "verification check rejected by provider".to_string(),
                };
                Err(CoreError::Upstream { code, message })
            }
        }
    }
}
