//! Per-user serialization: one async mutex per user id, held while a message is processed so
//! two messages from the same user never interleave history reads and writes.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Clone, Default)]
pub struct UserLocks {
    locks: Arc<Mutex<HashMap<i64, Arc<Mutex<()>>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other message of `user_id` is in flight. The lock is released when the
    /// guard is dropped.
    pub async fn acquire(&self, user_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // Entries nobody holds or waits on.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(user_id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of users with a message in flight or waiting.
    pub async fn active_users(&self) -> usize {
        let locks = self.locks.lock().await;
        locks.values().filter(|l| Arc::strong_count(l) > 1).count()
    }
}
