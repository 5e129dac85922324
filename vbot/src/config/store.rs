//! History and profile persistence settings. Also used by the offline CLI commands, which
//! need no Telegram token or model key.

use anyhow::Result;
use history::DEFAULT_HISTORY_THRESHOLD;
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Record store backend selected by RECORD_STORE_TYPE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStoreType {
    /// One JSON file per turn under `<data_dir>/users/<id>/`.
    File,
    /// sqlx SQLite table.
    Sqlite,
}

impl RecordStoreType {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "file" => Ok(Self::File),
            "sqlite" => Ok(Self::Sqlite),
            other => anyhow::bail!("RECORD_STORE_TYPE must be 'file' or 'sqlite', got '{}'", other),
        }
    }
}

impl fmt::Display for RecordStoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => f.write_str("file"),
            Self::Sqlite => f.write_str("sqlite"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// DATA_DIR: user scopes, downloads and scratch space.
    pub data_dir: PathBuf,
    /// HISTORY_THRESHOLD: eviction budget in characters.
    pub history_threshold: usize,
    /// RECORD_STORE_TYPE
    pub record_store_type: RecordStoreType,
    /// RECORD_SQLITE_URL, used when the store type is sqlite.
    pub record_sqlite_url: String,
    /// PROFILE_TEMPLATE_FILE: bundled default personalization document.
    pub profile_template_file: PathBuf,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self> {
        let data_dir = PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string()));
        let history_threshold = env::var("HISTORY_THRESHOLD")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_HISTORY_THRESHOLD);
        let record_store_type =
            RecordStoreType::parse(&env::var("RECORD_STORE_TYPE").unwrap_or_default())?;
        let record_sqlite_url = env::var("RECORD_SQLITE_URL")
            .unwrap_or_else(|_| "sqlite:./data/history.db".to_string());
        let profile_template_file = PathBuf::from(
            env::var("PROFILE_TEMPLATE_FILE").unwrap_or_else(|_| "./mentagram.json".to_string()),
        );

        Ok(Self {
            data_dir,
            history_threshold,
            record_store_type,
            record_sqlite_url,
            profile_template_file,
        })
    }

    /// Downloaded Telegram files.
    pub fn download_dir(&self) -> PathBuf {
        self.data_dir.join("downloads")
    }

    /// Scratch directories and synthesized audio.
    pub fn work_dir(&self) -> PathBuf {
        self.data_dir.join("tmp")
    }
}
