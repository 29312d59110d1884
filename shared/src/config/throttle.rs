//! Anti-spam throttle window configuration
//!
//! Every window is the number of seconds added to "now" to produce the
//! earliest instant at which the next request is allowed. Deadlines are
//! stored and compared against wall-clock time at check time; nothing is
//! swept in the background.

use serde::{Deserialize, Serialize};

/// Throttle windows for the account-scoped and address-scoped gates
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ThrottleWindows {
    /// Applied to the account after an email verification mail is sent
    pub email_request_seconds: i64,

    /// Applied to the account after an email request is rejected because
    /// the address is verified on another account
    pub email_conflict_seconds: i64,

    /// Re-armed on the owning account whenever an email code is submitted
    pub email_submit_rearm_seconds: i64,

    /// Applied to the account after a phone verification send
    pub phone_request_seconds: i64,

    /// Applied to the account after a phone request is rejected because
    /// the number is verified on an account already
    pub phone_conflict_seconds: i64,

    /// Applied to the account after every phone code check attempt
    pub phone_check_seconds: i64,

    /// Re-armed after a successful phone verification so the user can
    /// immediately add another number
    pub phone_verified_rearm_seconds: i64,

    /// Address-scoped block window for email code check attempts
    pub spam_block_seconds: i64,
}

impl Default for ThrottleWindows {
    fn default() -> Self {
        Self {
            email_request_seconds: 300,
            email_conflict_seconds: 20,
            email_submit_rearm_seconds: 10,
            phone_request_seconds: 120,
            phone_conflict_seconds: 20,
            phone_check_seconds: 5,
            phone_verified_rearm_seconds: 5,
            spam_block_seconds: 5,
        }
    }
}
