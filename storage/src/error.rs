use thiserror::Error;

/// Failures of the record stores.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    /// Record content is valid JSON but not a turn record.
    #[error("Malformed record: {0}")]
    Malformed(String),
    /// Scope names must be a plain path segment.
    #[error("Invalid user id: {0}")]
    InvalidUserId(String),
    #[error("Invalid record id: {0}")]
    InvalidRecordId(String),
}

impl StorageError {
    /// Errors that concern one record's content, as opposed to the store itself.
    pub fn is_record_level(&self) -> bool {
        matches!(self, StorageError::Json(_) | StorageError::Malformed(_))
    }
}
