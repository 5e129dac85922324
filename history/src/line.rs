//! One `(role, text)` line of reconstructed history.

use serde::{Deserialize, Serialize};

/// A single history message. Roles are kept as written (`user`, `assistant`, `system`, or any
/// role a legacy record or profile used); mapping to model roles happens at prompt assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryLine {
    pub role: String,
    pub text: String,
}

impl HistoryLine {
    pub fn new(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            text: text.into(),
        }
    }
}

impl From<(String, String)> for HistoryLine {
    fn from((role, text): (String, String)) -> Self {
        Self { role, text }
    }
}
