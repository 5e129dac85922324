//! File-per-record store: `<data_dir>/users/<user_id>/<YYYYmmdd_HHMMSS>_<seq>_<suffix>.json`.
//!
//! Each file holds one turn plus its `created_at` and `seq`; records are ordered by `seq`. Legacy
//! files without those fields sort first, by modification time. The user's personalization
//! profile lives in the same directory under [`PROFILE_FILE_NAME`] and is never enumerated,
//! deleted or counted here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::StorageError;
use crate::models::{sort_oldest_first, RecordId, RecordPayload, StoredRecord, TurnRecord};
use crate::record_store::{user_scope_dir, RecordStore, SequenceGenerator};

/// File name of the per-user personalization profile, kept next to the turn records.
pub const PROFILE_FILE_NAME: &str = "init_config.json";

/// Sequence embedded in a file name written by [`FileRecordStore::append`]; `None` for legacy names.
fn seq_from_file_name(name: &str) -> Option<u64> {
    name.strip_suffix(".json")?.split('_').nth(2)?.parse().ok()
}

#[derive(Serialize)]
struct TurnFile<'a> {
    user: &'a str,
    assistant: &'a str,
    created_at: DateTime<Utc>,
    seq: u64,
}

/// Record store backed by one JSON file per turn.
#[derive(Debug)]
pub struct FileRecordStore {
    root: PathBuf,
    sequence: SequenceGenerator,
}

impl FileRecordStore {
    /// Creates a store rooted at `data_dir`; user scopes live under `data_dir/users/`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: data_dir.into(),
            sequence: SequenceGenerator::new(),
        }
    }

    /// Directory holding the user's records and profile.
    pub fn user_dir(&self, user_id: &str) -> Result<PathBuf, StorageError> {
        user_scope_dir(&self.root, user_id)
    }

    fn record_path(&self, user_id: &str, id: &RecordId) -> Result<PathBuf, StorageError> {
        let name = id.0.as_str();
        let valid = name.ends_with(".json")
            && name != PROFILE_FILE_NAME
            && !name.contains(['/', '\\'])
            && !name.starts_with('.');
        if !valid {
            return Err(StorageError::InvalidRecordId(name.to_string()));
        }
        Ok(self.user_dir(user_id)?.join(name))
    }

    /// Names of the turn record files currently in the user directory (unordered).
    async fn record_file_names(dir: &Path) -> Result<Vec<String>, StorageError> {
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.ends_with(".json") && name != PROFILE_FILE_NAME {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Reads one record file. `Ok(None)` when it vanished or cannot be parsed.
    async fn read_record(path: &Path, name: String) -> Result<Option<StoredRecord>, StorageError> {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let parsed = serde_json::from_str::<Value>(&raw)
            .map_err(StorageError::from)
            .and_then(|value| RecordPayload::from_value(&value).map(|payload| (value, payload)));
        let (value, payload) = match parsed {
            Ok(parsed) => parsed,
            Err(e) if e.is_record_level() => {
                warn!(file = %path.display(), error = %e, "Skipping corrupt record file");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let embedded_time = value
            .get("created_at")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc));
        let created_at = match embedded_time {
            Some(t) => t,
            None => match tokio::fs::metadata(path).await {
                Ok(meta) => DateTime::<Utc>::from(meta.modified()?),
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(e.into()),
            },
        };
        let seq = value.get("seq").and_then(Value::as_u64).unwrap_or(0);

        Ok(Some(StoredRecord {
            id: RecordId(name),
            payload,
            created_at,
            seq,
        }))
    }
}

#[async_trait]
impl RecordStore for FileRecordStore {
    async fn append(&self, user_id: &str, record: &TurnRecord) -> Result<RecordId, StorageError> {
        let dir = self.user_dir(user_id)?;
        tokio::fs::create_dir_all(&dir).await?;

        if let Some(highest) = Self::record_file_names(&dir)
            .await?
            .iter()
            .filter_map(|name| seq_from_file_name(name))
            .max()
        {
            self.sequence.observe(highest);
        }
        let created_at = Utc::now();
        let seq = self.sequence.next();
        let suffix = Uuid::new_v4().simple().to_string();
        let name = format!(
            "{}_{:020}_{}.json",
            created_at.format("%Y%m%d_%H%M%S"),
            seq,
            &suffix[..8]
        );
        let body = serde_json::to_vec(&TurnFile {
            user: &record.user_text,
            assistant: &record.assistant_text,
            created_at,
            seq,
        })?;

        let path = dir.join(&name);
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(&body).await?;
        file.sync_all().await?;

        debug!(user_id = %user_id, record_id = %name, seq = seq, "Appended turn record");
        Ok(RecordId(name))
    }

    async fn list_ordered(&self, user_id: &str) -> Result<Vec<StoredRecord>, StorageError> {
        let dir = self.user_dir(user_id)?;
        let mut records = Vec::new();
        for name in Self::record_file_names(&dir).await? {
            let path = dir.join(&name);
            if let Some(record) = Self::read_record(&path, name).await? {
                records.push(record);
            }
        }
        sort_oldest_first(&mut records);
        Ok(records)
    }

    async fn delete(&self, user_id: &str, id: &RecordId) -> Result<(), StorageError> {
        let path = self.record_path(user_id, id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(user_id = %user_id, record_id = %id, "Deleted turn record");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn clear(&self, user_id: &str) -> Result<usize, StorageError> {
        let dir = self.user_dir(user_id)?;
        let mut removed = 0;
        for name in Self::record_file_names(&dir).await? {
            match tokio::fs::remove_file(dir.join(&name)).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        info!(user_id = %user_id, removed = removed, "Cleared turn records");
        Ok(removed)
    }
}
