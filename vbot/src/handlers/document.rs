//! Document uploads: `mentagram.json` replaces the user's personalization profile, an audio file
//! becomes the user's reference voice. Other documents fall through.

use async_trait::async_trait;
use history::HistoryManager;
use pipeline::messages::{REFERENCE_APOLOGY, REFERENCE_SAVED};
use pipeline::ReferenceVoice;
use std::sync::Arc;
use tracing::{error, info, instrument};
use vbot_core::{Attachment, Bot, Handler, HandlerResponse, Message, Result};

use super::replies::{PROFILE_APOLOGY, PROFILE_SAVED};
use super::PROFILE_DOCUMENT_NAME;

pub struct DocumentHandler {
    bot: Arc<dyn Bot>,
    history: Arc<HistoryManager>,
    reference: Arc<ReferenceVoice>,
}

impl DocumentHandler {
    pub fn new(bot: Arc<dyn Bot>, history: Arc<HistoryManager>, reference: Arc<ReferenceVoice>) -> Self {
        Self {
            bot,
            history,
            reference,
        }
    }

    async fn reply(&self, message: &Message, text: &str) -> Result<HandlerResponse> {
        self.bot.reply_to(message, text).await?;
        Ok(HandlerResponse::Reply(text.to_string()))
    }

    async fn save_profile(&self, message: &Message, file_id: &str) -> Result<HandlerResponse> {
        let user_id = message.user.scope_id();
        let saved = async {
            let path = self.bot.get_file(file_id).await.map_err(|e| e.to_string())?;
            let read = tokio::fs::read_to_string(&path).await;
            self.bot.release_file(&path).await;
            let raw = read.map_err(|e| e.to_string())?;
            self.history
                .profiles()
                .save_document(&user_id, &raw)
                .await
                .map_err(|e| e.to_string())
        }
        .await;

        match saved {
            Ok(profile) => {
                info!(
                    user_id = %user_id,
                    has_system_prompt = profile.system_prompt.is_some(),
                    seed_lines = profile.chat_history.len(),
                    "Personalization profile uploaded"
                );
                self.reply(message, PROFILE_SAVED).await
            }
            Err(e) => {
                error!(user_id = %user_id, error = %e, "Error processing mentagram.json file");
                self.reply(message, PROFILE_APOLOGY).await
            }
        }
    }

    async fn save_reference(&self, message: &Message) -> Result<HandlerResponse> {
        match self.reference.upload(message).await {
            Ok(_) => self.reply(message, REFERENCE_SAVED).await,
            Err(e) => {
                error!(user_id = message.user.id, error = %e, "Reference voice upload failed");
                self.reply(message, REFERENCE_APOLOGY).await
            }
        }
    }
}

#[async_trait]
impl Handler for DocumentHandler {
    #[instrument(skip(self, message), fields(user_id = message.user.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let Some(attachment @ Attachment::Document { file_id, file_name, .. }) =
            &message.attachment
        else {
            return Ok(HandlerResponse::Continue);
        };

        if file_name.as_deref() == Some(PROFILE_DOCUMENT_NAME) && attachment.mime_contains("json") {
            info!(user_id = message.user.id, "step: profile document upload");
            return self.save_profile(message, file_id).await;
        }
        if attachment.mime_contains("audio") {
            info!(user_id = message.user.id, "step: reference voice upload");
            return self.save_reference(message).await;
        }
        Ok(HandlerResponse::Continue)
    }
}
