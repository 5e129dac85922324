//! Text pipeline: reply generation for one user message and best-effort voice delivery.

use history::HistoryManager;
use llm_client::LlmClient;
use prompt::{build_messages, default_persona};
use speech::{reference_file_name, AudioConverter, TextToSpeech};
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use vbot_core::{Bot, Message, TextFormat};

use crate::delivery::{fallback_policy, Delivery, VoiceError};
use crate::error::PipelineError;
use crate::language::{prepare_for_voice, primary_subtag};
use crate::messages::{TEXT_APOLOGY, VOICE_FORBIDDEN_HINT};

/// Result of [`TextPipeline::respond`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOutcome {
    /// The model answered; the reply went out as voice or text.
    Replied(Delivery),
    /// The model call failed; the user got the generic apology and nothing was recorded.
    Apologized,
}

pub struct TextPipeline {
    bot: Arc<dyn Bot>,
    llm: Arc<dyn LlmClient>,
    history: Arc<HistoryManager>,
    tts: Arc<dyn TextToSpeech>,
    converter: Arc<dyn AudioConverter>,
}

impl TextPipeline {
    pub fn new(
        bot: Arc<dyn Bot>,
        llm: Arc<dyn LlmClient>,
        history: Arc<HistoryManager>,
        tts: Arc<dyn TextToSpeech>,
        converter: Arc<dyn AudioConverter>,
    ) -> Self {
        Self {
            bot,
            llm,
            history,
            tts,
            converter,
        }
    }

    pub fn history(&self) -> &Arc<HistoryManager> {
        &self.history
    }

    /// Answers `text` from `message`'s user in `language` (any BCP-47 tag, collapsed to its
    /// primary subtag). Only transport failures while replying are returned as errors.
    #[instrument(skip(self, message, text), fields(user_id = message.user.id, chat_id = message.chat.id))]
    pub async fn respond(
        &self,
        message: &Message,
        text: &str,
        language: &str,
    ) -> Result<TextOutcome, PipelineError> {
        let language = primary_subtag(language);
        let user_id = message.user.scope_id();

        let response = match self.generate(&user_id, text, &language).await {
            Ok(response) => response,
            Err(e) => {
                error!(user_id = %user_id, error = %e, "Reply generation failed");
                self.bot.reply_to(message, TEXT_APOLOGY).await?;
                return Ok(TextOutcome::Apologized);
            }
        };

        let delivery = self.deliver(message, &response, &language).await?;
        Ok(TextOutcome::Replied(delivery))
    }

    /// Builds the prompt (profile prompt or default persona, history, `text`), calls the model
    /// and records the turn. Nothing is recorded when the model call fails.
    #[instrument(skip(self, text))]
    pub async fn generate(
        &self,
        user_id: &str,
        text: &str,
        language: &str,
    ) -> Result<String, PipelineError> {
        let context = self.history.prompt_context(user_id).await?;
        let system_prompt = context
            .system_prompt
            .unwrap_or_else(|| default_persona(language));
        let messages = build_messages(
            &system_prompt,
            context
                .history
                .iter()
                .map(|line| (line.role.as_str(), line.text.as_str())),
            text,
        );
        info!(user_id = %user_id, message_count = messages.len(), "step: calling language model");

        let response = self.llm.complete(messages).await.map_err(PipelineError::Llm)?;
        if response.trim().is_empty() {
            return Err(PipelineError::Llm(anyhow::anyhow!(
                "language model returned an empty reply"
            )));
        }

        if let Err(e) = self.history.record_turn(user_id, text, &response).await {
            error!(user_id = %user_id, error = %e, "Failed to record turn");
        }
        Ok(response)
    }

    /// Sends `response` as a synthesized voice note in the user's reference voice, falling back
    /// to the unmodified text as a Markdown reply.
    #[instrument(skip(self, message, response), fields(user_id = message.user.id))]
    pub async fn deliver(
        &self,
        message: &Message,
        response: &str,
        language: &str,
    ) -> Result<Delivery, PipelineError> {
        let reference = reference_file_name(&message.user.scope_id());
        let attempt = self
            .try_voice(message, &prepare_for_voice(response), language, &reference)
            .await;
        if let Err(e) = &attempt {
            warn!(error = %e, forbidden = e.is_forbidden(), "Voice reply failed, falling back to text");
        }

        match fallback_policy(&attempt) {
            None => {
                info!("step: voice reply sent");
                Ok(Delivery::voice())
            }
            Some(plan) => {
                if plan.privacy_hint {
                    self.bot.reply_to(message, VOICE_FORBIDDEN_HINT).await?;
                }
                self.bot
                    .reply_formatted(message, response, TextFormat::Markdown)
                    .await?;
                info!("step: text reply sent");
                Ok(Delivery::text())
            }
        }
    }

    async fn try_voice(
        &self,
        message: &Message,
        text: &str,
        language: &str,
        reference: &str,
    ) -> Result<(), VoiceError> {
        let wav = self
            .tts
            .synthesize(text, language, reference)
            .await
            .map_err(VoiceError::Synthesis)?;
        let ogg = wav.with_extension("ogg");

        let sent = match self.converter.to_ogg_opus(&wav, &ogg).await {
            Ok(()) => self
                .bot
                .send_voice(message, &ogg)
                .await
                .map_err(VoiceError::Delivery),
            Err(e) => Err(VoiceError::Encoding(e)),
        };

        remove_artifact(&wav).await;
        remove_artifact(&ogg).await;
        sent
    }
}

/// Deletes a generated audio file; failures are logged only.
async fn remove_artifact(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove audio artifact"),
    }
}
