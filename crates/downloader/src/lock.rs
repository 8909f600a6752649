// crates/downloader/src/lock.rs
//! Per-key transfer locks
//!
//! At most one writer per cache key at a time within this process. Two
//! transfers for the same URL would otherwise share one in-progress file
//! and interleave writes. Locks are created on first use and live for the
//! process lifetime; the map is bounded by the number of distinct URLs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Default)]
pub(crate) struct KeyLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl KeyLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for `key`, waiting while another transfer holds it.
    pub(crate) async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self
                .locks
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(key.to_string()).or_default())
        };

        lock.lock_owned().await
    }
}
