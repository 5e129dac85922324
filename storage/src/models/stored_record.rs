//! Stored record envelope: payload plus the identity and ordering data assigned by the store.

use chrono::{DateTime, Utc};
use std::fmt;

use super::payload::RecordPayload;

/// Store-specific record identifier (file name for the file store, UUID for SQLite).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub String);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A record as enumerated from backing storage.
#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub id: RecordId,
    pub payload: RecordPayload,
    pub created_at: DateTime<Utc>,
    /// Append sequence; 0 for legacy records written before sequences existed.
    pub seq: u64,
}

impl StoredRecord {
    pub fn char_len(&self) -> usize {
        self.payload.char_len()
    }

    /// Sort key. Legacy records (`seq == 0`) come first, by creation time; every
    /// sequenced record follows in append order, whatever its wall-clock time says.
    pub fn ordering_key(&self) -> (bool, Option<DateTime<Utc>>, u64, &str) {
        let legacy_time = (self.seq == 0).then_some(self.created_at);
        (self.seq != 0, legacy_time, self.seq, self.id.0.as_str())
    }
}

/// Sorts records oldest first using [`StoredRecord::ordering_key`].
pub(crate) fn sort_oldest_first(records: &mut [StoredRecord]) {
    records.sort_by(|a, b| a.ordering_key().cmp(&b.ordering_key()));
}
