//! Conflict resolution for successful verifications.
//!
//! Invoked once a code check has succeeded (token match for email,
//! provider approval for phone). Turns the target claim into the single
//! authoritative binding for its address value: promotes primary where
//! due, removes every competing unverified claim, and deactivates
//! accounts that lose their primary designate with it.

use std::sync::Arc;

use crate::domain::entities::account::ban;
use crate::domain::entities::contact::Contact;
use crate::domain::entities::verification_token::VerificationToken;
use crate::errors::CoreResult;
use crate::repositories::{AccountRepository, ContactRepository, TokenRepository};
use crate::services::notify::{Notification, NotificationDispatcher};
use crate::sync::KeyedLock;

/// Resolver for the post-verification contact/account mutations
pub struct VerificationResolver<A, C, T, N>
where
    A: AccountRepository,
    C: ContactRepository,
    T: TokenRepository,
    N: NotificationDispatcher,
{
    accounts: Arc<A>,
    contacts: Arc<C>,
    tokens: Arc<T>,
    dispatcher: Arc<N>,
    /// Serializes resolutions per address value so two concurrent
    /// verifications cannot both observe "no existing verified record"
    locks: KeyedLock,
}

impl<A, C, T, N> VerificationResolver<A, C, T, N>
where
    A: AccountRepository,
    C: ContactRepository,
    T: TokenRepository,
    N: NotificationDispatcher,
{
    pub fn new(accounts: Arc<A>, contacts: Arc<C>, tokens: Arc<T>, dispatcher: Arc<N>) -> Self {
        Self {
            accounts,
            contacts,
            tokens,
            dispatcher,
            locks: KeyedLock::new(),
        }
    }

    /// Resolve a successful verification of `contact`.
    ///
    /// `token` is the consumed email token; phone verifications pass
    /// `None` because the provider holds the code. Returns the contact
    /// in its post-resolution state.
    pub async fn resolve(
        &self,
        contact: Contact,
        token: Option<&VerificationToken>,
    ) -> CoreResult<Contact> {
        let address = contact.address.clone();
        let channel = contact.channel;
        let _guard = self.locks.acquire(&address).await;

        // The target claim becomes authoritative.
        let mut contact = contact;
        contact.verify();
        let mut contact = self.contacts.update(contact).await?;
        tracing::info!(
            contact_id = %contact.id,
            account_id = %contact.account_id,
            event = "contact_verified",
            "contact record verified"
        );

        // Primary promotion: the first verified contact of a channel is
        // promoted, and an unverified primary designate is taken over.
        match self.contacts.find_primary(contact.account_id, channel).await? {
            None => {
                contact.primary = true;
                contact = self.contacts.update(contact).await?;
                tracing::info!(
                    contact_id = %contact.id,
                    event = "primary_promoted",
                    "first verified contact of channel promoted to primary"
                );
            }
            Some(current) if !current.verified && current.id != contact.id => {
                let mut demoted = current;
                demoted.primary = false;
                self.contacts.update(demoted).await?;
                contact.primary = true;
                contact = self.contacts.update(contact).await?;
                tracing::info!(
                    contact_id = %contact.id,
                    event = "primary_promoted",
                    "verified contact took over primary from unverified designate"
                );
            }
            Some(_) => {}
        }

        // Competing unverified claims on other accounts, collected in a
        // single query inside the same critical section as the deletes.
        let losers = self
            .contacts
            .find_unverified_claims(channel, &address, contact.account_id)
            .await?;

        // Accounts whose only claim of this channel was their primary
        // designate lose their identity anchor: deactivate and notify.
        // Scan all of them, not just the first.
        for loser in &losers {
            let only_claim = self
                .contacts
                .count_by_account_and_channel(loser.account_id, channel)
                .await?
                == 1;
            if loser.primary && only_claim {
                if let Some(mut account) = self.accounts.find_by_id(loser.account_id).await? {
                    account.deactivate(ban::CONTACT_SUPERSEDED);
                    account.normalize();
                    self.accounts.update(account).await?;
                    tracing::info!(
                        account_id = %loser.account_id,
                        reason = ban::CONTACT_SUPERSEDED,
                        event = "account_deactivated",
                        "account deactivated, its primary contact was verified elsewhere"
                    );
                }
                let notification =
                    Notification::contact_superseded(loser.account_id, channel, &address);
                if let Err(e) = self.dispatcher.dispatch(notification).await {
                    tracing::warn!(
                        account_id = %loser.account_id,
                        error = %e,
                        event = "notification_failed",
                        "best-effort supersede notification failed"
                    );
                }
            }
        }

        // Delete every competing claim, silently when no deactivation
        // applied. Tokens bound to a deleted claim die with it.
        let removed = losers.len();
        for loser in losers {
            self.tokens.delete_by_contact(loser.id).await?;
            self.contacts.delete(loser.id).await?;
        }
        if removed > 0 {
            tracing::info!(
                address = %address,
                count = removed,
                event = "duplicate_claims_removed",
                "removed superseded unverified claims"
            );
        }

        // The consumed token is destroyed last.
        if let Some(token) = token {
            self.tokens.delete(token.id).await?;
        }

        Ok(contact)
    }
}
