//! # OpenAI API client
//!
//! A small layer over [async-openai] used by the bot's LLM client: one
//! chat completion per call, first choice only, plus [`mask_token`] so the
//! key can appear in logs.

use anyhow::{anyhow, Result};
use async_openai::{
    config::OpenAIConfig,
    types::{CreateChatCompletionRequest, CreateChatCompletionRequestArgs},
    Client,
};
use std::sync::Arc;

pub use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
};

const VISIBLE_HEAD: usize = 7;
const VISIBLE_TAIL: usize = 4;

/// Masks a secret for logging as `head***tail` (7 leading, 4 trailing characters).
///
/// Secrets too short to hide anything in the middle are rendered as `***`.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= VISIBLE_HEAD + VISIBLE_TAIL {
        return "***".to_string();
    }
    let head: String = chars[..VISIBLE_HEAD].iter().collect();
    let tail: String = chars[chars.len() - VISIBLE_TAIL..].iter().collect();
    format!("{head}***{tail}")
}

#[derive(Clone)]
pub struct OpenAIClient {
    inner: Arc<Client<OpenAIConfig>>,
    masked_key: String,
}

impl OpenAIClient {
    /// Client for an OpenAI-compatible endpoint. `base_url` of `None` keeps the library default.
    pub fn new(api_key: impl Into<String>, base_url: Option<String>) -> Self {
        let api_key = api_key.into();
        let masked_key = mask_token(&api_key);
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(url) = base_url {
            config = config.with_api_base(url);
        }
        Self {
            inner: Arc::new(Client::with_config(config)),
            masked_key,
        }
    }

    pub fn masked_key(&self) -> &str {
        &self.masked_key
    }

    fn build_request(
        &self,
        model: &str,
        messages: Vec<ChatCompletionRequestMessage>,
    ) -> Result<CreateChatCompletionRequest> {
        Ok(CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .build()?)
    }

    /// Sends `messages` and returns the content of the first choice (empty when the
    /// model returned no text). Conversation text is only logged at debug level.
    pub async fn chat_completion(
        &self,
        model: &str,
        messages: Vec<ChatCompletionRequestMessage>,
    ) -> Result<String> {
        tracing::info!(
            model = %model,
            messages = messages.len(),
            api_key = %self.masked_key,
            "chat completion request"
        );

        let request = self.build_request(model, messages)?;
        if tracing::enabled!(tracing::Level::DEBUG) {
            if let Ok(body) = serde_json::to_string(&request) {
                tracing::debug!(body = %body, "chat completion body");
            }
        }

        let response = self.inner.chat().create(request).await?;
        if let Some(usage) = &response.usage {
            tracing::info!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "chat completion usage"
            );
        }

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("chat completion returned no choices"))?;
        if let Some(reason) = &choice.finish_reason {
            tracing::debug!(finish_reason = ?reason, "chat completion finished");
        }
        Ok(choice.message.content.unwrap_or_default())
    }
}
