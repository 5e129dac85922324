//! SQLite record store: one row per turn in `turn_records`, payload kept as the same JSON the file
//! store writes so both backends share parsing and length accounting.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::StorageError;
use crate::models::{RecordId, RecordPayload, StoredRecord, TurnRecord};
use crate::record_store::{validate_user_id, RecordStore, SequenceGenerator};
use crate::sqlite_pool::SqlitePoolManager;

/// Record store backed by a SQLite table.
pub struct SqliteRecordStore {
    pool_manager: SqlitePoolManager,
    sequence: SequenceGenerator,
}

impl SqliteRecordStore {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let store = Self {
            pool_manager,
            sequence: SequenceGenerator::new(),
        };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating turn_records table if not exists");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS turn_records (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                seq INTEGER NOT NULL,
                payload TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_turn_records_user_seq ON turn_records(user_id, seq)",
        )
        .execute(pool)
        .await?;

        let highest: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(seq), 0) FROM turn_records")
            .fetch_one(pool)
            .await?;
        self.sequence.observe(highest.max(0) as u64);

        Ok(())
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn append(&self, user_id: &str, record: &TurnRecord) -> Result<RecordId, StorageError> {
        validate_user_id(user_id)?;
        let id = Uuid::new_v4().to_string();
        let seq = self.sequence.next();
        let created_at = Utc::now();
        let payload = serde_json::to_string(record)?;

        sqlx::query(
            "INSERT INTO turn_records (id, user_id, seq, payload, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(seq as i64)
        .bind(&payload)
        .bind(created_at)
        .execute(self.pool_manager.pool())
        .await?;

        debug!(user_id = %user_id, record_id = %id, seq = seq, "Appended turn record");
        Ok(RecordId(id))
    }

    async fn list_ordered(&self, user_id: &str) -> Result<Vec<StoredRecord>, StorageError> {
        validate_user_id(user_id)?;
        let rows = sqlx::query(
            "SELECT id, seq, payload, created_at FROM turn_records WHERE user_id = ? \
             ORDER BY (seq <> 0) ASC, CASE WHEN seq = 0 THEN created_at END ASC, seq ASC, id ASC",
        )
        .bind(user_id)
        .fetch_all(self.pool_manager.pool())
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.try_get("id")?;
            let seq: i64 = row.try_get("seq")?;
            let payload: String = row.try_get("payload")?;
            let created_at: DateTime<Utc> = row.try_get("created_at")?;
            let parsed = serde_json::from_str::<serde_json::Value>(&payload)
                .map_err(StorageError::from)
                .and_then(|value| RecordPayload::from_value(&value));
            let payload = match parsed {
                Ok(payload) => payload,
                Err(e) if e.is_record_level() => {
                    warn!(user_id = %user_id, record_id = %id, error = %e, "Skipping corrupt record row");
                    continue;
                }
                Err(e) => return Err(e),
            };
            records.push(StoredRecord {
                id: RecordId(id),
                payload,
                created_at,
                seq: seq.max(0) as u64,
            });
        }
        Ok(records)
    }

    async fn delete(&self, user_id: &str, id: &RecordId) -> Result<(), StorageError> {
        validate_user_id(user_id)?;
        sqlx::query("DELETE FROM turn_records WHERE user_id = ? AND id = ?")
            .bind(user_id)
            .bind(&id.0)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(())
    }

    async fn clear(&self, user_id: &str) -> Result<usize, StorageError> {
        validate_user_id(user_id)?;
        let result = sqlx::query("DELETE FROM turn_records WHERE user_id = ?")
            .bind(user_id)
            .execute(self.pool_manager.pool())
            .await?;
        info!(user_id = %user_id, removed = result.rows_affected(), "Cleared turn records");
        Ok(result.rows_affected() as usize)
    }
}
