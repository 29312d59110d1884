//! Notification dispatch seam.
//!
//! The dispatcher performs best-effort delivery: the resolver and the
//! verification flows log failures and move on, they never couple their
//! durability to delivery. Template rendering is the dispatcher's
//! concern; the core hands over a template id and structured context.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::contact::ContactChannel;
use crate::domain::entities::verification_token::VerificationToken;

/// Who a notification is addressed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// An account owner, resolved to their primary contact by the dispatcher
    Account(Uuid),
    /// A raw address, used before any account binding exists
    Address(String),
}

/// Message templates known to the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    /// Verification code delivery mail
    VerificationCode,
    /// A contact was removed because it was verified on another account
    ContactSuperseded,
}

impl Template {
    /// System message catalog code, exposed through the API
    pub fn catalog_code(&self, channel: ContactChannel) -> i32 {
        match (self, channel) {
            (Template::VerificationCode, _) => 0,
            (Template::ContactSuperseded, ContactChannel::Email) => 1,
            (Template::ContactSuperseded, ContactChannel::Phone) => 2,
        }
    }
}

/// A single notification handed to the dispatcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub recipient: Recipient,
    pub template: Template,
    pub catalog_code: i32,
    pub context: serde_json::Value,
}

impl Notification {
    /// Verification code mail for an email claim. The code is mailed in
    /// two 3-digit halves, the way the templates render it.
    pub fn verification_code(address: &str, token: &VerificationToken) -> Self {
        Self {
            recipient: Recipient::Address(address.to_string()),
            template: Template::VerificationCode,
            catalog_code: Template::VerificationCode.catalog_code(ContactChannel::Email),
            context: json!({
                "address": address,
                "code_1": &token.code[0..3],
                "code_2": &token.code[3..6],
            }),
        }
    }

    /// System message to the owner of a claim that was superseded by a
    /// verification on another account
    pub fn contact_superseded(account_id: Uuid, channel: ContactChannel, address: &str) -> Self {
        Self {
            recipient: Recipient::Account(account_id),
            template: Template::ContactSuperseded,
            catalog_code: Template::ContactSuperseded.catalog_code(channel),
            context: json!({
                "channel": channel,
                "address": address,
            }),
        }
    }
}

/// Trait for notification delivery integration
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Deliver a notification, best-effort
    async fn dispatch(&self, notification: Notification) -> Result<(), String>;
}
