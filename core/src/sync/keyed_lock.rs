//! Async mutex keyed by string value.
//!
//! The verification resolver must serialize per address value: two
//! concurrent verification attempts for the same address must not both
//! observe "no existing verified record". Locks are created on first
//! use and retained for the process lifetime.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// A map of independently lockable async mutexes, one per key
#[derive(Default)]
pub struct KeyedLock {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyedLock {
    /// Create an empty keyed lock
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `key`, waiting if another holder is active.
    /// Guards for different keys never contend.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let entry = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        entry.lock_owned().await
    }
}
