//! Media attached to an inbound message.

use serde::{Deserialize, Serialize};

/// Media carried by an inbound message. File ids are transport references resolved via
/// [`crate::Bot::get_file`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Attachment {
    /// Recorded voice note.
    Voice {
        file_id: String,
        duration_secs: u32,
        mime_type: Option<String>,
    },
    /// Uploaded file (personalization document, reference voice, ...).
    Document {
        file_id: String,
        file_name: Option<String>,
        mime_type: Option<String>,
    },
}

impl Attachment {
    pub fn file_id(&self) -> &str {
        match self {
            Attachment::Voice { file_id, .. } | Attachment::Document { file_id, .. } => file_id,
        }
    }

    /// Returns true if the declared mime type contains `needle` (e.g. `"audio"`, `"json"`).
    pub fn mime_contains(&self, needle: &str) -> bool {
        let mime = match self {
            Attachment::Voice { mime_type, .. } | Attachment::Document { mime_type, .. } => {
                mime_type
            }
        };
        mime.as_deref().map(|m| m.contains(needle)).unwrap_or(false)
    }
}
