//! Storage crate: per-user turn record persistence.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – TurnRecord, RecordPayload (current and legacy shapes), StoredRecord
//! - [`record_store`] – RecordStore trait and the append sequence generator
//! - [`file_store`] – FileRecordStore (one JSON file per turn under `<data>/users/<id>/`)
//! - [`sqlite_store`] – SqliteRecordStore (sqlx)
//! - [`sqlite_pool`] – SqlitePoolManager

mod error;
mod file_store;
mod models;
mod record_store;
mod sqlite_pool;
mod sqlite_store;

pub use error::StorageError;
pub use file_store::{FileRecordStore, PROFILE_FILE_NAME};
pub use models::{RecordId, RecordPayload, StoredRecord, TurnRecord, ROLE_ASSISTANT, ROLE_USER};
pub use record_store::{user_scope_dir, RecordStore, SequenceGenerator};
pub use sqlite_pool::SqlitePoolManager;
pub use sqlite_store::SqliteRecordStore;
