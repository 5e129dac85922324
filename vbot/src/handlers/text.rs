//! Last handler: typed text goes through the text pipeline, anything else gets the
//! unsupported-message reply.

use async_trait::async_trait;
use pipeline::{TextPipeline, DEFAULT_LANGUAGE};
use std::sync::Arc;
use tracing::{info, instrument};
use vbot_core::{Bot, Handler, HandlerResponse, Message, Result};

use super::replies::UNSUPPORTED;

pub struct TextHandler {
    bot: Arc<dyn Bot>,
    pipeline: Arc<TextPipeline>,
}

impl TextHandler {
    pub fn new(bot: Arc<dyn Bot>, pipeline: Arc<TextPipeline>) -> Self {
        Self { bot, pipeline }
    }
}

#[async_trait]
impl Handler for TextHandler {
    #[instrument(skip(self, message), fields(user_id = message.user.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let Some(text) = message.text() else {
            info!(user_id = message.user.id, message_type = %message.message_type, "Unsupported message type");
            self.bot.reply_to(message, UNSUPPORTED).await?;
            return Ok(HandlerResponse::Reply(UNSUPPORTED.to_string()));
        };
        let outcome = self.pipeline.respond(message, text, DEFAULT_LANGUAGE).await?;
        info!(user_id = message.user.id, outcome = ?outcome, "step: text message handled");
        Ok(HandlerResponse::Stop)
    }
}
