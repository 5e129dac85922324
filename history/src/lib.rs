//! # History
//!
//! Builds the conversation history a prompt is assembled from.
//!
//! - [`HistoryManager`] records turns into a [`storage::RecordStore`] and runs the eviction sweep
//!   after every append, keeping each user's stored history under a character budget.
//! - [`ProfileStore`] keeps the per-user personalization profile (system prompt + seed history);
//!   it is prepended on reconstruction and never counts against the budget.
//!
//! ## External interactions
//!
//! - **Record store**: file or SQLite backend from the `storage` crate.
//! - **Filesystem**: profile documents under `<data_dir>/users/<id>/init_config.json`.

mod error;
mod eviction;
mod line;
mod manager;
mod profile;

pub use error::HistoryError;
pub use eviction::{plan_eviction, EvictionPlan};
pub use line::HistoryLine;
pub use manager::{HistoryConfig, HistoryManager, PromptContext, DEFAULT_HISTORY_THRESHOLD};
pub use profile::{Profile, ProfileStore, DEFAULT_TEMPLATE_JSON};
