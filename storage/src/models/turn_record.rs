//! Turn record model: one user message plus the assistant reply to it.

use serde::{Deserialize, Serialize};

/// Role name used for the user half of a turn.
pub const ROLE_USER: &str = "user";
/// Role name used for the assistant half of a turn.
pub const ROLE_ASSISTANT: &str = "assistant";

/// One exchange unit. Immutable once written; stores only ever delete whole records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    #[serde(rename = "user")]
    pub user_text: String,
    #[serde(rename = "assistant")]
    pub assistant_text: String,
}

impl TurnRecord {
    pub fn new(user_text: impl Into<String>, assistant_text: impl Into<String>) -> Self {
        Self {
            user_text: user_text.into(),
            assistant_text: assistant_text.into(),
        }
    }

    /// Character count of both halves (Unicode scalar values, not bytes).
    pub fn char_len(&self) -> usize {
        self.user_text.chars().count() + self.assistant_text.chars().count()
    }
}
