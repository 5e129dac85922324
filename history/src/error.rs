//! History error types.

use storage::StorageError;
use thiserror::Error;

/// Errors from history and profile operations.
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid profile document: {0}")]
    InvalidProfile(String),
}
