//! Address-scoped spam block repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::CoreError;

/// Repository contract for the address-scoped throttle.
///
/// Records are keyed by the literal address string, independent of any
/// account, so the block survives across competing accounts and applies
/// before authentication.
#[async_trait]
pub trait SpamBlockRepository: Send + Sync {
    /// Conditional upsert: if no record exists for `address`, create one
    /// blocking until `now + window_seconds` and return `true`; if the
    /// existing record has expired (`now > blocked_until`), replace it
    /// with a fresh block and return `true`; otherwise return `false`.
    ///
    /// The whole check-and-write must be atomic per address so that two
    /// concurrent attempts cannot both be allowed.
    async fn begin_window(
        &self,
        address: &str,
        now: DateTime<Utc>,
        window_seconds: i64,
    ) -> Result<bool, CoreError>;

    /// Seconds until the block for `address` lifts, if one is active
    async fn time_remaining(
        &self,
        address: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<i64>, CoreError>;
}
