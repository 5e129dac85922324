//! Slash commands: `/start`, `/reset`, `/mentagram`, `/reset_mentagram`. Anything else that
//! starts with `/` is left to the text handler.

use async_trait::async_trait;
use history::HistoryManager;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use vbot_core::{Bot, Handler, HandlerResponse, Message, Result};

use super::replies::{
    HISTORY_RESET, HISTORY_RESET_FAILED, PROFILE_ABSENT, PROFILE_EXPORT_APOLOGY,
    PROFILE_EXPORT_CAPTION, PROFILE_RESET, PROFILE_RESET_FAILED,
};
use super::PROFILE_DOCUMENT_NAME;
use crate::assets::{Greeting, FALLBACK_GREETING};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    Start,
    Reset,
    Mentagram,
    ResetMentagram,
}

impl Command {
    /// First word of `text` as a known command. A `@botname` suffix is ignored.
    pub(crate) fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let name = word.split('@').next().unwrap_or(word);
        match name {
            "/start" => Some(Self::Start),
            "/reset" => Some(Self::Reset),
            "/mentagram" => Some(Self::Mentagram),
            "/reset_mentagram" => Some(Self::ResetMentagram),
            _ => None,
        }
    }
}

pub struct CommandHandler {
    bot: Arc<dyn Bot>,
    history: Arc<HistoryManager>,
    greeting: Greeting,
}

impl CommandHandler {
    pub fn new(bot: Arc<dyn Bot>, history: Arc<HistoryManager>, greeting: Greeting) -> Self {
        Self {
            bot,
            history,
            greeting,
        }
    }

    async fn reply(&self, message: &Message, text: &str) -> Result<HandlerResponse> {
        self.bot.reply_to(message, text).await?;
        Ok(HandlerResponse::Reply(text.to_string()))
    }

    /// Greeting as a photo caption; text reply when the photo cannot be sent.
    async fn start(&self, message: &Message) -> Result<HandlerResponse> {
        let Some(greeting) = self.greeting.compose().await else {
            return self.reply(message, FALLBACK_GREETING).await;
        };
        match self
            .bot
            .send_photo(message, &self.greeting.image, &greeting)
            .await
        {
            Ok(()) => Ok(HandlerResponse::Reply(greeting)),
            Err(e) => {
                warn!(error = %e, image = %self.greeting.image.display(), "Greeting photo not sent, replying with text");
                self.reply(message, &greeting).await
            }
        }
    }

    async fn reset(&self, message: &Message, user_id: &str) -> Result<HandlerResponse> {
        match self.history.clear(user_id).await {
            Ok(removed) => {
                info!(user_id = %user_id, removed, "Chat history reset");
                self.reply(message, HISTORY_RESET).await
            }
            Err(e) => {
                error!(user_id = %user_id, error = %e, "Failed to reset chat history");
                self.reply(message, HISTORY_RESET_FAILED).await
            }
        }
    }

    /// Sends the stored profile, or the default template, as `mentagram.json`.
    async fn export_profile(&self, message: &Message, user_id: &str) -> Result<HandlerResponse> {
        info!(user_id = %user_id, "User requested mentagram configuration");
        let document = self
            .history
            .profiles()
            .export_current_or_default(user_id)
            .await
            .map_err(|e| e.to_string())
            .and_then(|doc| serde_json::to_vec_pretty(&doc).map_err(|e| e.to_string()));
        match document {
            Ok(content) => {
                self.bot
                    .send_document(message, PROFILE_DOCUMENT_NAME, content, PROFILE_EXPORT_CAPTION)
                    .await?;
                Ok(HandlerResponse::Stop)
            }
            Err(e) => {
                error!(user_id = %user_id, error = %e, "Failed to export profile");
                self.reply(message, PROFILE_EXPORT_APOLOGY).await
            }
        }
    }

    async fn reset_profile(&self, message: &Message, user_id: &str) -> Result<HandlerResponse> {
        match self.history.profiles().reset(user_id).await {
            Ok(true) => self.reply(message, PROFILE_RESET).await,
            Ok(false) => self.reply(message, PROFILE_ABSENT).await,
            Err(e) => {
                error!(user_id = %user_id, error = %e, "Failed to reset profile");
                self.reply(message, PROFILE_RESET_FAILED).await
            }
        }
    }
}

#[async_trait]
impl Handler for CommandHandler {
    #[instrument(skip(self, message), fields(user_id = message.user.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let Some(command) = message.text().and_then(Command::parse) else {
            return Ok(HandlerResponse::Continue);
        };
        let user_id = message.user.scope_id();
        info!(user_id = %user_id, command = ?command, "step: command");

        match command {
            Command::Start => self.start(message).await,
            Command::Reset => self.reset(message, &user_id).await,
            Command::Mentagram => self.export_profile(message, &user_id).await,
            Command::ResetMentagram => self.reset_profile(message, &user_id).await,
        }
    }
}
