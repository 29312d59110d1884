//! Account-scoped throttle deadlines.

use chrono::{DateTime, Duration, Utc};

use crate::errors::{CoreError, CoreResult};

/// Seconds until the deadline lifts, if it lies in the future
pub fn seconds_remaining(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<i64> {
    deadline
        .map(|d| (d - now).num_seconds())
        .filter(|remaining| *remaining > 0)
}

/// Reject with a throttle error while the deadline lies in the future
pub fn gate(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> CoreResult<()> {
    match seconds_remaining(deadline, now) {
        Some(seconds_remaining) => Err(CoreError::Throttled { seconds_remaining }),
        None => Ok(()),
    }
}

/// New deadline `window_seconds` from now
pub fn arm(now: DateTime<Utc>, window_seconds: i64) -> DateTime<Utc> {
    now + Duration::seconds(window_seconds)
}
