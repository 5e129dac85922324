//! History manager: records turns, runs the eviction sweep, reconstructs prompt history.

use std::sync::Arc;
use storage::{RecordStore, TurnRecord};
use tracing::{debug, info, instrument, warn};

use crate::error::HistoryError;
use crate::eviction::plan_eviction;
use crate::line::HistoryLine;
use crate::profile::ProfileStore;

/// Eviction threshold used when none is configured.
pub const DEFAULT_HISTORY_THRESHOLD: usize = 4000;

/// Deployment-wide history settings, fixed after startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Character budget for a user's stored turns. The profile does not count against it.
    pub threshold: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_HISTORY_THRESHOLD,
        }
    }
}

/// Everything prompt assembly needs from one user scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptContext {
    /// Profile override of the system prompt, if the user uploaded one.
    pub system_prompt: Option<String>,
    /// Profile seed history followed by stored turns, oldest first.
    pub history: Vec<HistoryLine>,
}

pub struct HistoryManager {
    store: Arc<dyn RecordStore>,
    profiles: ProfileStore,
    config: HistoryConfig,
}

impl HistoryManager {
    pub fn new(store: Arc<dyn RecordStore>, profiles: ProfileStore, config: HistoryConfig) -> Self {
        Self {
            store,
            profiles,
            config,
        }
    }

    pub fn config(&self) -> HistoryConfig {
        self.config
    }

    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    /// Appends one turn, then evicts the oldest turns until the user is back under the threshold.
    /// Returns the number of evicted records.
    #[instrument(skip(self, user_text, assistant_text))]
    pub async fn record_turn(
        &self,
        user_id: &str,
        user_text: &str,
        assistant_text: &str,
    ) -> Result<usize, HistoryError> {
        let record = TurnRecord::new(user_text, assistant_text);
        let id = self.store.append(user_id, &record).await?;
        debug!(user_id = %user_id, record_id = %id, chars = record.char_len(), "Turn recorded");
        self.evict(user_id).await
    }

    /// Runs one eviction sweep over the user's stored turns.
    async fn evict(&self, user_id: &str) -> Result<usize, HistoryError> {
        let records = self.store.list_ordered(user_id).await?;
        let plan = plan_eviction(&records, self.config.threshold);
        if plan.evict.is_empty() {
            return Ok(0);
        }
        for id in &plan.evict {
            self.store.delete(user_id, id).await?;
        }
        info!(
            user_id = %user_id,
            evicted = plan.evict.len(),
            remaining = plan.remaining,
            total_before = plan.total_before,
            total_after = plan.total_after,
            threshold = self.config.threshold,
            "History evicted"
        );
        if plan.total_after > self.config.threshold {
            warn!(user_id = %user_id, total = plan.total_after, "Newest turn alone exceeds the history threshold");
        }
        Ok(plan.evict.len())
    }

    /// Profile seed history first, then every stored turn expanded to its lines, oldest first.
    pub async fn reconstruct(&self, user_id: &str) -> Result<Vec<HistoryLine>, HistoryError> {
        Ok(self.prompt_context(user_id).await?.history)
    }

    /// Loads the profile and stored turns for building a prompt.
    pub async fn prompt_context(&self, user_id: &str) -> Result<PromptContext, HistoryError> {
        let profile = self.profiles.load(user_id).await?;
        let records = self.store.list_ordered(user_id).await?;

        let mut history = profile.chat_history;
        history.extend(
            records
                .iter()
                .flat_map(|record| record.payload.lines())
                .map(HistoryLine::from),
        );

        Ok(PromptContext {
            system_prompt: profile.system_prompt,
            history,
        })
    }

    /// Removes all stored turns. The profile is left in place.
    pub async fn clear(&self, user_id: &str) -> Result<usize, HistoryError> {
        let removed = self.store.clear(user_id).await?;
        info!(user_id = %user_id, removed, "History cleared");
        Ok(removed)
    }
}
