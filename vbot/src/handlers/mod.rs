//! Handlers of the bot chain, in order: logging, optional allowlist, commands, document
//! uploads, voice messages, text (and the unsupported-message fallback).

mod auth;
mod command;
mod document;
mod logging;
mod text;
mod voice;

pub use auth::AuthHandler;
pub use command::CommandHandler;
pub use document::DocumentHandler;
pub use logging::LoggingHandler;
pub use text::TextHandler;
pub use voice::VoiceHandler;

/// Reply texts of the bot-level handlers.
pub mod replies {
    pub const UNAUTHORIZED: &str = "You are not authorized to use this bot.";
    pub const UNSUPPORTED: &str = "Sorry, this message type is not supported yet.";
    pub const HISTORY_RESET: &str = "Chat history has been reset.";
    pub const HISTORY_RESET_FAILED: &str = "Sorry, there was an error resetting the chat history.";
    pub const PROFILE_RESET: &str = "Your mentagram configuration has been reset to the default.";
    pub const PROFILE_RESET_FAILED: &str = "Sorry, there was an error resetting your mentagram configuration.";
    pub const PROFILE_ABSENT: &str = "You have no custom mentagram configuration; the default is already in use.";
    pub const PROFILE_SAVED: &str = "Initialization file successfully processed!";
    pub const PROFILE_APOLOGY: &str = "Sorry, there was an error processing the initialization file.";
    pub const PROFILE_EXPORT_CAPTION: &str = "Here's your current mentagram configuration. You can modify this file and upload it back to change how I behave.";
    pub const PROFILE_EXPORT_APOLOGY: &str = "Sorry, there was an error preparing your mentagram configuration.";
}

/// File name users upload their personalization document under, and receive it as.
pub const PROFILE_DOCUMENT_NAME: &str = "mentagram.json";
