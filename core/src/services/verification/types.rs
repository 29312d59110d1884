//! Result and input types for the verification flows

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::contact::Contact;

/// Target of an email verification request: either an address (which may
/// create a new claim) or an existing contact record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailTarget {
    Address(String),
    ContactId(Uuid),
}

/// Outcome of a successful code request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestCodeResult {
    /// The (possibly newly created) unverified contact record
    pub contact: Contact,

    /// Earliest instant the next request is allowed
    pub next_request_at: DateTime<Utc>,
}
