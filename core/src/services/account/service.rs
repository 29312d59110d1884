//! Account service implementation.

use chrono::Utc;
use std::sync::Arc;

use vouch_shared::utils::validation;

use crate::domain::entities::account::{Account, TIER_DEFAULT, TIER_SUPERUSER};
use crate::domain::entities::contact::{Contact, ContactChannel};
use crate::domain::value_objects::session::SessionPair;
use crate::errors::{
    ConflictError, CoreError, CoreResult, NotFoundError, PermissionError, ValidationError,
};
use crate::repositories::{AccountRepository, ContactRepository, TokenRepository};
use crate::services::issuer::TokenIssuer;
use crate::services::notify::{Notification, NotificationDispatcher};
use crate::services::session::SessionTokenService;
use uuid::Uuid;

/// Input for account registration
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: Option<String>,
    pub password: String,
    pub tier: i32,
}

impl RegisterInput {
    pub fn new(username: impl Into<String>, email: Option<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email,
            password: password.into(),
            tier: TIER_DEFAULT,
        }
    }
}

/// Account lifecycle service: registration, login, contact management
pub struct AccountService<A, C, T, N, J>
where
    A: AccountRepository,
    C: ContactRepository,
    T: TokenRepository,
    N: NotificationDispatcher,
    J: SessionTokenService,
{
    accounts: Arc<A>,
    contacts: Arc<C>,
    tokens: Arc<T>,
    issuer: Arc<TokenIssuer<T>>,
    dispatcher: Arc<N>,
    sessions: Arc<J>,
}

impl<A, C, T, N, J> AccountService<A, C, T, N, J>
where
    A: AccountRepository,
    C: ContactRepository,
    T: TokenRepository,
    N: NotificationDispatcher,
    J: SessionTokenService,
{
    pub fn new(
        accounts: Arc<A>,
        contacts: Arc<C>,
        tokens: Arc<T>,
        issuer: Arc<TokenIssuer<T>>,
        dispatcher: Arc<N>,
        sessions: Arc<J>,
    ) -> Self {
        Self {
            accounts,
            contacts,
            tokens,
            issuer,
            dispatcher,
            sessions,
        }
    }

    /// Register a new account.
    ///
    /// The email given at registration becomes the account's primary
    /// designate: primary from the start, unverified until the owner
    /// proves it. A verification code is mailed right away. Superusers
    /// skip address validation.
    pub async fn register(&self, input: RegisterInput) -> CoreResult<Account> {
        if input.username.trim().is_empty() {
            return Err(ValidationError::RequiredField {
                field: "username".to_string(),
            }
            .into());
        }
        if input.password.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "password".to_string(),
            }
            .into());
        }

        // Validate and check the email before any state change.
        let superuser = input.tier == TIER_SUPERUSER;
        let email = match input.email {
            Some(raw) if !superuser => {
                let normalized = validation::normalize_email(&raw);
                if !validation::is_valid_email(&normalized) {
                    return Err(ValidationError::InvalidEmail.into());
                }
                if self
                    .contacts
                    .find_verified_by_address(ContactChannel::Email, &normalized)
                    .await?
                    .is_some()
                {
                    return Err(ConflictError::VerifiedOnOtherAccount.into());
                }
                Some(normalized)
            }
            other => other,
        };

        if self
            .accounts
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(ConflictError::UsernameTaken.into());
        }

        let password_hash = bcrypt::hash(&input.password, bcrypt::DEFAULT_COST)
            .map_err(|e| CoreError::Internal {
                message: format!("password hashing failed: {}", e),
            })?;
        let account = self
            .accounts
            .create(Account::new(input.username, password_hash, input.tier))
            .await?;
        tracing::info!(
            account_id = %account.id,
            event = "account_registered",
            "registered new account"
        );

        if let Some(address) = email {
            let contact = self
                .contacts
                .create(Contact::new(
                    account.id,
                    ContactChannel::Email,
                    address,
                    true,
                ))
                .await?;
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
                    "best-effort registration mail failed"
                );
            }
        }

        Ok(account)
    }

    /// Authenticate by handle and password, issuing a session pair
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> CoreResult<(Account, SessionPair)> {
        let account = self
            .accounts
            .find_by_username(username)
            .await?
            .ok_or(PermissionError::InvalidCredentials)?;

        let matches = bcrypt::verify(password, &account.password_hash)
            .map_err(|e| CoreError::Internal {
                message: format!("password verification failed: {}", e),
            })?;
        if !matches {
            return Err(PermissionError::InvalidCredentials.into());
        }

        if !account.is_active {
            return Err(PermissionError::AccountDeactivated {
                reason: account.ban_reason,
            }
            .into());
        }

        let pair = self.sessions.issue(&account).await?;
        Ok((account, pair))
    }

    /// Move the logout-all watermark, revoking every session minted
    /// before this instant
    pub async fn logout_all(&self, account: &Account) -> CoreResult<Account> {
        let mut account = account.clone();
        account.revoke_sessions(Utc::now());
        account.normalize();
        self.accounts.update(account).await
    }

    /// Deactivate the account, recording the reason code.
    /// Repeated calls keep the latest reason.
    pub async fn deactivate(&self, account: &Account, reason: i32) -> CoreResult<Account> {
        let mut account = account.clone();
        account.deactivate(reason);
        account.normalize();
        let account = self.accounts.update(account).await?;
        tracing::info!(
            account_id = %account.id,
            reason = reason,
            event = "account_deactivated",
            "account deactivated"
        );
        Ok(account)
    }

    /// Reactivate the account; the ban reason resets to the active sentinel
    pub async fn reactivate(&self, account: &Account) -> CoreResult<Account> {
        let mut account = account.clone();
        account.reactivate();
        self.accounts.update(account).await
    }

    /// Remove a contact record from the account. Primary contacts can
    /// never be removed; any pending token dies with the record.
    pub async fn remove_contact(&self, account: &Account, contact_id: Uuid) -> CoreResult<()> {
        let contact = self
            .contacts
            .find_by_id(contact_id)
            .await?
            .filter(|c| c.account_id == account.id)
            .ok_or(NotFoundError::ContactNotFound)?;

        if contact.primary {
            return Err(PermissionError::PrimaryContactRemoval.into());
        }

        self.tokens.delete_by_contact(contact.id).await?;
        self.contacts.delete(contact.id).await?;
        Ok(())
    }

    /// Make a verified contact the account's primary for its channel,
    /// demoting the current primary in the same mutation
    pub async fn set_primary_contact(
        &self,
        account: &Account,
        contact_id: Uuid,
    ) -> CoreResult<Contact> {
        let mut contact = self
            .contacts
            .find_by_id(contact_id)
            .await?
            .filter(|c| c.account_id == account.id)
            .ok_or(NotFoundError::ContactNotFound)?;

        if contact.primary {
            return Err(ConflictError::AlreadyPrimary.into());
        }
        if !contact.verified {
            return Err(ConflictError::ContactNotVerified.into());
        }

        if let Some(current) = self
            .contacts
            .find_primary(account.id, contact.channel)
            .await?
        {
            let mut demoted = current;
            demoted.primary = false;
            self.contacts.update(demoted).await?;
        }

        contact.primary = true;
        self.contacts.update(contact).await
    }
}
