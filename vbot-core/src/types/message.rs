//! Message type for the core model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{attachment::Attachment, chat::Chat, user::User};

/// A single inbound message with user, chat, text content and optional media.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub user: User,
    pub chat: Chat,
    /// Text body; empty for pure media messages.
    pub content: String,
    /// `text`, `voice`, `document` or `other`.
    pub message_type: String,
    pub created_at: DateTime<Utc>,
    pub attachment: Option<Attachment>,
}

impl Message {
    /// Text content when the message has non-empty text.
    pub fn text(&self) -> Option<&str> {
        if self.content.is_empty() {
            None
        } else {
            Some(&self.content)
        }
    }
}
