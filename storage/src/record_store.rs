//! Record store interface shared by the file and SQLite backends.

use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::StorageError;
use crate::models::{RecordId, StoredRecord, TurnRecord};

/// Persists turn records per user. Every call goes to backing storage; nothing is cached.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Writes a new record with a fresh id and creation time. Never overwrites an existing record.
    async fn append(&self, user_id: &str, record: &TurnRecord) -> Result<RecordId, StorageError>;

    /// Enumerates the user's records oldest first. Re-reads storage on every call.
    async fn list_ordered(&self, user_id: &str) -> Result<Vec<StoredRecord>, StorageError>;

    /// Removes exactly one record. Deleting a record that is already gone is a no-op.
    async fn delete(&self, user_id: &str, id: &RecordId) -> Result<(), StorageError>;

    /// Removes all turn records of the user and returns how many were removed.
    /// The personalization profile is not a turn record and is left alone.
    async fn clear(&self, user_id: &str) -> Result<usize, StorageError>;
}

/// Monotonic append sequence: microseconds since the epoch, bumped past the previous value so two
/// appends within the same microsecond (or after a clock step back) still order correctly.
///
/// Stores call [`SequenceGenerator::observe`] with the highest sequence already persisted in a
/// scope before appending, so a restart with a slower clock cannot issue a smaller value.
#[derive(Debug, Default)]
pub struct SequenceGenerator {
    last: AtomicU64,
}

impl SequenceGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the floor so the next value is greater than `seen`.
    pub fn observe(&self, seen: u64) {
        self.last.fetch_max(seen, Ordering::SeqCst);
    }

    pub fn next(&self) -> u64 {
        let now = Utc::now().timestamp_micros().max(0) as u64;
        let mut prev = self.last.load(Ordering::SeqCst);
        loop {
            let candidate = now.max(prev + 1);
            match self
                .last
                .compare_exchange(prev, candidate, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}

/// User ids become directory names and row keys; only allow `[A-Za-z0-9_-]`.
pub(crate) fn validate_user_id(user_id: &str) -> Result<(), StorageError> {
    let valid = !user_id.is_empty()
        && user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidUserId(user_id.to_string()))
    }
}

/// Directory of a user scope under `data_dir`: `data_dir/users/<user_id>`.
/// Shared by the file record store and the personalization profile store.
pub fn user_scope_dir(data_dir: &Path, user_id: &str) -> Result<PathBuf, StorageError> {
    validate_user_id(user_id)?;
    Ok(data_dir.join("users").join(user_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observed_sequence_is_exceeded() {
        let seq = SequenceGenerator::new();
        let far_future = (Utc::now().timestamp_micros() as u64) + 3_600_000_000;
        seq.observe(far_future);
        assert_eq!(seq.next(), far_future + 1);
        seq.observe(5);
        assert_eq!(seq.next(), far_future + 2);
    }

    #[test]
    fn test_sequence_is_strictly_increasing() {
        let seq = SequenceGenerator::new();
        let mut prev = seq.next();
        for _ in 0..1000 {
            let next = seq.next();
            assert!(next > prev);
            prev = next;
        }
    }

    #[test]
    fn test_validate_user_id() {
        assert!(validate_user_id("123456").is_ok());
        assert!(validate_user_id("user_1-a").is_ok());
        assert!(validate_user_id("").is_err());
        assert!(validate_user_id("../etc").is_err());
        assert!(validate_user_id("a/b").is_err());
    }
}
