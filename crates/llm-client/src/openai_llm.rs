//! OpenAI implementation of [`LlmClient`]: wraps openai-client.

use anyhow::Result;
use async_trait::async_trait;
use prompt::ChatMessage;
use tracing::instrument;

use super::{chat_message_to_openai, LlmClient, OpenAISettings};

#[derive(Clone)]
pub struct OpenAILlmClient {
    client: openai_client::OpenAIClient,
    model: String,
}

impl OpenAILlmClient {
    pub fn new(settings: &OpenAISettings) -> Self {
        Self {
            client: openai_client::OpenAIClient::new(
                settings.api_key.clone(),
                Some(settings.base_url.clone()),
            ),
            model: settings.model.clone(),
        }
    }
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    #[instrument(skip(self, messages), fields(model = %self.model))]
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let openai_messages = messages
            .iter()
            .map(chat_message_to_openai)
            .collect::<Result<Vec<_>>>()?;
        self.client.chat_completion(&self.model, openai_messages).await
    }
}
