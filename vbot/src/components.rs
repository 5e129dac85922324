//! Component factory: builds the collaborators, pipelines and handler chain from config.
//! Isolates assembly logic from the runner; tests pass mock collaborators.

use anyhow::{Context, Result};
use history::{HistoryConfig, HistoryManager, ProfileStore};
use llm_client::{LlmClient, OpenAILlmClient};
use pipeline::{ReferenceVoice, TextPipeline, VoicePipeline};
use speech::{
    AudioConverter, FfmpegConverter, HttpSpeechToText, HttpTextToSpeech, SpeechToText,
    TextToSpeech,
};
use std::sync::Arc;
use storage::{FileRecordStore, RecordStore, SqliteRecordStore};
use teloxide::prelude::*;
use tracing::{error, info, instrument};
use vbot_core::Bot as CoreBot;

use crate::assets::{load_allowlist, load_languages, Greeting};
use crate::chain::HandlerChain;
use crate::config::{BaseConfig, BotConfig, RecordStoreType, StoreConfig};
use crate::handlers::{
    AuthHandler, CommandHandler, DocumentHandler, LoggingHandler, TextHandler, VoiceHandler,
};
use crate::telegram::TelegramBotAdapter;

/// External systems the bot talks to.
pub struct Collaborators {
    pub bot: Arc<dyn CoreBot>,
    pub llm: Arc<dyn LlmClient>,
    pub stt: Arc<dyn SpeechToText>,
    pub tts: Arc<dyn TextToSpeech>,
    pub converter: Arc<dyn AudioConverter>,
}

impl Collaborators {
    /// Production collaborators: Telegram, OpenAI, the HTTP speech services and ffmpeg.
    pub fn from_config(config: &BotConfig, teloxide_bot: Bot) -> Self {
        let store = &config.store;
        Self {
            bot: Arc::new(TelegramBotAdapter::new(teloxide_bot, store.download_dir())),
            llm: Arc::new(OpenAILlmClient::new(&config.openai)),
            stt: Arc::new(HttpSpeechToText::new(config.services.stt_api_url.clone())),
            tts: Arc::new(HttpTextToSpeech::new(
                config.services.tts_api_url.clone(),
                store.work_dir(),
            )),
            converter: Arc::new(FfmpegConverter::new(config.services.ffmpeg_path.clone())),
        }
    }
}

/// Core dependencies of the handler chain; produced by the component factory.
pub struct BotComponents {
    pub bot: Arc<dyn CoreBot>,
    pub history: Arc<HistoryManager>,
    pub text_pipeline: Arc<TextPipeline>,
    pub voice_pipeline: Arc<VoicePipeline>,
    pub reference_voice: Arc<ReferenceVoice>,
    pub greeting: Greeting,
}

/// teloxide Bot, pointed at the custom API server when one is configured.
pub fn build_teloxide_bot(base: &BaseConfig) -> Bot {
    let bot = Bot::new(base.bot_token.clone());
    match base.api_url() {
        Ok(Some(url)) => bot.set_api_url(url),
        Ok(None) => bot,
        Err(e) => {
            error!(error = %e, "Ignoring invalid Bot API URL");
            bot
        }
    }
}

/// Opens the record store selected by RECORD_STORE_TYPE.
#[instrument(skip(store))]
pub async fn create_record_store(store: &StoreConfig) -> Result<Arc<dyn RecordStore>> {
    tokio::fs::create_dir_all(&store.data_dir)
        .await
        .with_context(|| format!("Failed to create data dir {}", store.data_dir.display()))?;

    Ok(match store.record_store_type {
        RecordStoreType::File => {
            info!(data_dir = %store.data_dir.display(), "Using file record store");
            Arc::new(FileRecordStore::new(store.data_dir.clone()))
        }
        RecordStoreType::Sqlite => {
            info!(database_url = %store.record_sqlite_url, "Using SQLite record store");
            Arc::new(
                SqliteRecordStore::new(&store.record_sqlite_url)
                    .await
                    .map_err(|e| {
                        error!(error = %e, "Failed to initialize SQLite record store");
                        anyhow::anyhow!("Failed to initialize SQLite record store: {}", e)
                    })?,
            )
        }
    })
}

/// History manager over the configured record store and the profile store.
pub async fn build_history_manager(store: &StoreConfig) -> Result<Arc<HistoryManager>> {
    let records = create_record_store(store).await?;
    let profiles = ProfileStore::new(
        store.data_dir.clone(),
        Some(store.profile_template_file.clone()),
    );
    Ok(Arc::new(HistoryManager::new(
        records,
        profiles,
        HistoryConfig {
            threshold: store.history_threshold,
        },
    )))
}

/// Builds pipelines and shared state around the given collaborators.
#[instrument(skip(config, collaborators))]
pub async fn build_bot_components(
    config: &BotConfig,
    collaborators: Collaborators,
) -> Result<BotComponents> {
    let work_dir = config.store.work_dir();
    tokio::fs::create_dir_all(&work_dir)
        .await
        .with_context(|| format!("Failed to create work dir {}", work_dir.display()))?;

    let history = build_history_manager(&config.store).await?;
    let languages = load_languages(&config.services.languages_file).await;
    info!(
        languages = ?languages,
        threshold = config.store.history_threshold,
        model = %config.openai.model,
        "Building bot components"
    );

    let Collaborators {
        bot,
        llm,
        stt,
        tts,
        converter,
    } = collaborators;

    let text_pipeline = Arc::new(TextPipeline::new(
        bot.clone(),
        llm,
        history.clone(),
        tts.clone(),
        converter.clone(),
    ));
    let voice_pipeline = Arc::new(VoicePipeline::new(
        bot.clone(),
        text_pipeline.clone(),
        stt,
        converter.clone(),
        languages.clone(),
        work_dir.clone(),
    ));
    let reference_voice = Arc::new(ReferenceVoice::new(bot.clone(), tts, converter, work_dir));
    let greeting = Greeting::new(
        config.services.greeting_file.clone(),
        config.services.greeting_image.clone(),
        languages,
    );

    Ok(BotComponents {
        bot,
        history,
        text_pipeline,
        voice_pipeline,
        reference_voice,
        greeting,
    })
}

/// Logging → allowlist (when configured) → commands → documents → voice → text.
pub fn build_handler_chain(config: &BotConfig, components: &BotComponents) -> Result<HandlerChain> {
    let mut chain = HandlerChain::new().add_handler(Arc::new(LoggingHandler));

    if let Some(path) = &config.services.allowed_users_file {
        let allowed = load_allowlist(path)?;
        info!(allowed_users = allowed.len(), "Allowlist enabled");
        chain = chain.add_handler(Arc::new(AuthHandler::new(components.bot.clone(), allowed)));
    }

    Ok(chain
        .add_handler(Arc::new(CommandHandler::new(
            components.bot.clone(),
            components.history.clone(),
            components.greeting.clone(),
        )))
        .add_handler(Arc::new(DocumentHandler::new(
            components.bot.clone(),
            components.history.clone(),
            components.reference_voice.clone(),
        )))
        .add_handler(Arc::new(VoiceHandler::new(components.voice_pipeline.clone())))
        .add_handler(Arc::new(TextHandler::new(
            components.bot.clone(),
            components.text_pipeline.clone(),
        ))))
}
