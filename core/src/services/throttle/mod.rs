//! Anti-spam throttle gates.
//!
//! Two independent gates exist: the account-scoped gate works on
//! "earliest next allowed" deadlines stored on the account, the
//! address-scoped gate ([`SpamGuard`]) works on blocks keyed by the
//! literal address string. Both are advisory: they gate the rate of
//! attempts, never the verification outcome itself.

pub mod account_gate;
pub mod spam_guard;

pub use account_gate::{arm, gate, seconds_remaining};
pub use spam_guard::SpamGuard;
