//! Voice notes go through the voice pipeline.

use async_trait::async_trait;
use pipeline::VoicePipeline;
use std::sync::Arc;
use tracing::{info, instrument};
use vbot_core::{Attachment, Handler, HandlerResponse, Message, Result};

pub struct VoiceHandler {
    pipeline: Arc<VoicePipeline>,
}

impl VoiceHandler {
    pub fn new(pipeline: Arc<VoicePipeline>) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl Handler for VoiceHandler {
    #[instrument(skip(self, message), fields(user_id = message.user.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if !matches!(message.attachment, Some(Attachment::Voice { .. })) {
            return Ok(HandlerResponse::Continue);
        }
        let outcome = self.pipeline.handle(message).await?;
        info!(user_id = message.user.id, outcome = ?outcome, "step: voice message handled");
        Ok(HandlerResponse::Stop)
    }
}
