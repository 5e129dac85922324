//! Chat transport abstraction: fetching inbound files, replying, editing and sending media.
//!
//! [`Bot`] is transport-agnostic; the `vbot` crate implements it on top of teloxide and tests
//! substitute recording mocks.

use crate::error::{Result, VbotError};
use crate::types::{Chat, Message};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Marker the transport puts into errors when the recipient's privacy settings reject voice notes.
pub const VOICE_FORBIDDEN_MARKER: &str = "VOICE_MESSAGES_FORBIDDEN";

/// How a text should be rendered by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    /// Sent verbatim, no parse mode.
    Plain,
    /// Model output; rendered as Markdown when the transport accepts it, otherwise verbatim.
    Markdown,
    /// Monospace status line (progress indicator).
    Code,
}

/// Abstraction for the chat transport. Implementations map to a concrete API (e.g. Telegram).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Resolves a transport file reference to a local readable path.
    async fn get_file(&self, file_id: &str) -> Result<PathBuf>;

    /// Hands back a path obtained from [`Bot::get_file`] once the caller is done with it.
    /// Transports that downloaded a copy delete it here; files they do not own are left alone.
    /// Failures are logged by the implementation and never reported.
    async fn release_file(&self, _path: &Path) {}

    /// Sends a plain-text reply to the given message (same chat).
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()>;

    /// Sends a reply rendered with `format`.
    async fn reply_formatted(&self, message: &Message, text: &str, format: TextFormat) -> Result<()>;

    /// Sends a reply and returns its id for later [`Bot::edit_message`] calls.
    async fn reply_and_return_id(
        &self,
        message: &Message,
        text: &str,
        format: TextFormat,
    ) -> Result<String>;

    /// Edits an already-sent message in place. `message_id` is transport-specific.
    async fn edit_message(
        &self,
        chat: &Chat,
        message_id: &str,
        text: &str,
        format: TextFormat,
    ) -> Result<()>;

    /// Sends an audio file as a voice note replying to `message`.
    async fn send_voice(&self, message: &Message, voice: &Path) -> Result<()>;

    /// Sends in-memory bytes as a document named `file_name`.
    async fn send_document(
        &self,
        message: &Message,
        file_name: &str,
        content: Vec<u8>,
        caption: &str,
    ) -> Result<()>;

    /// Sends an image file with a caption.
    async fn send_photo(&self, message: &Message, photo: &Path, caption: &str) -> Result<()>;
}

/// Parses a message id string into an i32. Used by edit_message.
pub fn parse_message_id(s: &str) -> Result<i32> {
    s.parse()
        .map_err(|_| VbotError::Bot(format!("Invalid message_id for edit: {}", s)))
}

/// Returns true if a delivery error was caused by the recipient forbidding voice messages.
pub fn is_voice_forbidden(error: &VbotError) -> bool {
    error.to_string().contains(VOICE_FORBIDDEN_MARKER)
}
