use async_trait::async_trait;
use tracing::{debug, info};
use vbot_core::{Attachment, Handler, HandlerResponse, Message, Result};

/// First link of the chain: one log line when a message arrives and one when it
/// has been answered. Message text is only logged at debug level.
pub struct LoggingHandler;

fn describe(attachment: Option<&Attachment>) -> String {
    match attachment {
        Some(Attachment::Voice { duration_secs, .. }) => format!("voice {duration_secs}s"),
        Some(Attachment::Document { file_name, .. }) => {
            format!("document {}", file_name.as_deref().unwrap_or("<unnamed>"))
        }
        None => "none".to_string(),
    }
}

#[async_trait]
impl Handler for LoggingHandler {
    fn name(&self) -> &'static str {
        "logging"
    }

    async fn before(&self, message: &Message) -> Result<bool> {
        info!(
            user_id = message.user.id,
            from = %message.user.display_name(),
            private = message.chat.is_private(),
            kind = %message.message_type,
            attachment = %describe(message.attachment.as_ref()),
            "message received"
        );
        debug!(user_id = message.user.id, text = %message.content, "message text");
        Ok(true)
    }

    async fn after(&self, message: &Message, response: &HandlerResponse) -> Result<()> {
        let elapsed_ms = (chrono::Utc::now() - message.created_at).num_milliseconds();
        info!(
            user_id = message.user.id,
            message_id = %message.id,
            response = %response,
            elapsed_ms,
            "message answered"
        );
        Ok(())
    }
}
