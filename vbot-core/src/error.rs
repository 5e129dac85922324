//! Errors crossing the handler boundary.
//!
//! Transport failures keep the transport's message text in [`VbotError::Bot`];
//! callers detect specific Telegram conditions by inspecting it (see
//! [`crate::is_voice_forbidden`]).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VbotError {
    #[error("Bot error: {0}")]
    Bot(String),

    /// A pipeline stage failed after the transport call succeeded.
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VbotError {
    /// True when the error came from the chat transport rather than our own stages.
    pub fn is_transport(&self) -> bool {
        matches!(self, VbotError::Bot(_))
    }
}

pub type Result<T> = std::result::Result<T, VbotError>;
