//! Shared fixtures for vbot integration tests: recording collaborators and a config rooted in a
//! temp directory, wired through the real component factory.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use llm_client::{LlmClient, OpenAISettings};
use prompt::ChatMessage;
use speech::{AudioConverter, SpeechError, SpeechToText, TextToSpeech, Transcription};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use vbot::config::{BaseConfig, RecordStoreType, ServicesConfig, StoreConfig};
use vbot::{
    build_bot_components, build_handler_chain, BotComponents, BotConfig, Collaborators,
    HandlerChain,
};
use vbot_core::{Attachment, Bot, Chat, Message, Result, TextFormat, User, VbotError};

pub const USER_ID: i64 = 42;

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text(String),
    Progress(String),
    Edit(String),
    Voice,
    Document { file_name: String, content: String },
    Photo { caption: String },
}

/// Records everything the bot would send; `get_file` serves registered local files.
#[derive(Default)]
pub struct RecordingBot {
    pub sent: Mutex<Vec<Sent>>,
    pub files: Mutex<HashMap<String, PathBuf>>,
    pub released: Mutex<Vec<PathBuf>>,
    pub photo_fails: Mutex<bool>,
}

impl RecordingBot {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    pub fn released(&self) -> Vec<PathBuf> {
        self.released.lock().unwrap().clone()
    }

    pub fn serve_file(&self, file_id: &str, path: PathBuf) {
        self.files.lock().unwrap().insert(file_id.to_string(), path);
    }

    fn push(&self, sent: Sent) {
        self.sent.lock().unwrap().push(sent);
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn get_file(&self, file_id: &str) -> Result<PathBuf> {
        self.files
            .lock()
            .unwrap()
            .get(file_id)
            .cloned()
            .ok_or_else(|| VbotError::Bot(format!("Bad Request: invalid file_id {}", file_id)))
    }

    async fn release_file(&self, path: &Path) {
        self.released.lock().unwrap().push(path.to_path_buf());
    }

    async fn reply_to(&self, _message: &Message, text: &str) -> Result<()> {
        self.push(Sent::Text(text.to_string()));
        Ok(())
    }

    async fn reply_formatted(&self, _message: &Message, text: &str, _format: TextFormat) -> Result<()> {
        self.push(Sent::Text(text.to_string()));
        Ok(())
    }

    async fn reply_and_return_id(&self, _message: &Message, text: &str, _format: TextFormat) -> Result<String> {
        self.push(Sent::Progress(text.to_string()));
        Ok("500".to_string())
    }

    async fn edit_message(&self, _chat: &Chat, _id: &str, text: &str, _format: TextFormat) -> Result<()> {
        self.push(Sent::Edit(text.to_string()));
        Ok(())
    }

    async fn send_voice(&self, _message: &Message, _voice: &Path) -> Result<()> {
        self.push(Sent::Voice);
        Ok(())
    }

    async fn send_document(&self, _message: &Message, file_name: &str, content: Vec<u8>, _caption: &str) -> Result<()> {
        self.push(Sent::Document {
            file_name: file_name.to_string(),
            content: String::from_utf8(content).unwrap(),
        });
        Ok(())
    }

    async fn send_photo(&self, _message: &Message, _photo: &Path, caption: &str) -> Result<()> {
        if *self.photo_fails.lock().unwrap() {
            return Err(VbotError::Bot("Bad Request: file not found".to_string()));
        }
        self.push(Sent::Photo {
            caption: caption.to_string(),
        });
        Ok(())
    }
}

/// Answers every prompt with a fixed text and keeps the prompts.
pub struct EchoLlm {
    pub reply: String,
    pub prompts: Mutex<Vec<Vec<ChatMessage>>>,
}

#[async_trait]
impl LlmClient for EchoLlm {
    async fn complete(&self, messages: Vec<ChatMessage>) -> anyhow::Result<String> {
        self.prompts.lock().unwrap().push(messages);
        Ok(self.reply.clone())
    }
}

pub struct FixedStt(pub Vec<(String, String)>);

#[async_trait]
impl SpeechToText for FixedStt {
    async fn transcribe(&self, _audio: &Path, _languages: &[String]) -> std::result::Result<Vec<Transcription>, SpeechError> {
        Ok(self
            .0
            .iter()
            .map(|(code, text)| Transcription {
                language_code: code.clone(),
                transcript: text.clone(),
            })
            .collect())
    }
}

/// Writes a stub WAV per synthesis; records reference uploads.
pub struct StubTts {
    pub output_dir: PathBuf,
    pub uploads: Mutex<Vec<String>>,
}

#[async_trait]
impl TextToSpeech for StubTts {
    async fn synthesize(&self, _text: &str, _language: &str, _reference: &str) -> std::result::Result<PathBuf, SpeechError> {
        let path = self.output_dir.join(format!("speech_{}.wav", Utc::now().timestamp_nanos_opt().unwrap_or_default()));
        tokio::fs::write(&path, b"RIFF").await?;
        Ok(path)
    }

    async fn upload_reference(&self, _audio: &Path, file_name: &str) -> std::result::Result<(), SpeechError> {
        self.uploads.lock().unwrap().push(file_name.to_string());
        Ok(())
    }
}

pub struct CopyConverter;

#[async_trait]
impl AudioConverter for CopyConverter {
    async fn normalize(&self, input: &Path, output: &Path) -> std::result::Result<(), SpeechError> {
        tokio::fs::copy(input, output).await?;
        Ok(())
    }

    async fn to_ogg_opus(&self, input: &Path, output: &Path) -> std::result::Result<(), SpeechError> {
        tokio::fs::copy(input, output).await?;
        Ok(())
    }
}

/// Config with every path inside `dir`.
pub fn test_config(dir: &Path, allowed_users_file: Option<PathBuf>) -> BotConfig {
    std::fs::write(dir.join("greeting.txt"), "Hi, I'm Janet.").unwrap();
    std::fs::write(dir.join("BCP-47.txt"), "en-US\nru-RU\n").unwrap();
    BotConfig {
        base: BaseConfig {
            bot_token: "test_bot_token_12345".to_string(),
            telegram_api_url: None,
            log_file: dir.join("vbot.log").to_string_lossy().to_string(),
        },
        openai: OpenAISettings {
            api_key: "sk-test".to_string(),
            base_url: "http://localhost:1".to_string(),
            model: "gpt-4".to_string(),
        },
        store: StoreConfig {
            data_dir: dir.join("data"),
            history_threshold: 4000,
            record_store_type: RecordStoreType::File,
            record_sqlite_url: String::new(),
            profile_template_file: dir.join("mentagram.json"),
        },
        services: ServicesConfig {
            stt_api_url: "http://localhost:5001".to_string(),
            tts_api_url: "http://localhost:5000".to_string(),
            ffmpeg_path: PathBuf::from("ffmpeg"),
            languages_file: dir.join("BCP-47.txt"),
            greeting_file: dir.join("greeting.txt"),
            greeting_image: dir.join("voclone.png"),
            allowed_users_file,
        },
    }
}

/// Real components and handler chain over recording collaborators.
pub struct App {
    pub dir: TempDir,
    pub bot: Arc<RecordingBot>,
    pub llm: Arc<EchoLlm>,
    pub tts: Arc<StubTts>,
    pub components: BotComponents,
    pub chain: HandlerChain,
}

impl App {
    pub async fn new() -> Self {
        Self::build(None, vec![("en-US", "What time is it?")]).await
    }

    pub async fn with_allowlist(users: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.txt");
        std::fs::write(&path, users).unwrap();
        Self::build_in(dir, Some(path), vec![]).await
    }

    pub async fn build(allowed_users_file: Option<PathBuf>, transcripts: Vec<(&str, &str)>) -> Self {
        Self::build_in(TempDir::new().unwrap(), allowed_users_file, transcripts).await
    }

    async fn build_in(dir: TempDir, allowed_users_file: Option<PathBuf>, transcripts: Vec<(&str, &str)>) -> Self {
        let config = test_config(dir.path(), allowed_users_file);
        let synth_dir = dir.path().join("synth");
        std::fs::create_dir_all(&synth_dir).unwrap();

        let bot = Arc::new(RecordingBot::default());
        let llm = Arc::new(EchoLlm {
            reply: "It is noon.".to_string(),
            prompts: Mutex::new(Vec::new()),
        });
        let tts = Arc::new(StubTts {
            output_dir: synth_dir,
            uploads: Mutex::new(Vec::new()),
        });
        let stt = Arc::new(FixedStt(
            transcripts
                .into_iter()
                .map(|(c, t)| (c.to_string(), t.to_string()))
                .collect(),
        ));

        let collaborators = Collaborators {
            bot: bot.clone(),
            llm: llm.clone(),
            stt,
            tts: tts.clone(),
            converter: Arc::new(CopyConverter),
        };
        let components = build_bot_components(&config, collaborators).await.unwrap();
        let chain = build_handler_chain(&config, &components).unwrap();

        Self {
            dir,
            bot,
            llm,
            tts,
            components,
            chain,
        }
    }

    pub fn user_dir(&self) -> PathBuf {
        self.dir.path().join("data").join("users").join(USER_ID.to_string())
    }

    /// Writes `content` to a local file and registers it under `file_id`.
    pub fn upload(&self, file_id: &str, name: &str, content: &[u8]) {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        self.bot.serve_file(file_id, path);
    }
}

pub fn message(content: &str, attachment: Option<Attachment>) -> Message {
    let message_type = match (&attachment, content.is_empty()) {
        (Some(Attachment::Voice { .. }), _) => "voice",
        (Some(Attachment::Document { .. }), _) => "document",
        (None, false) => "text",
        (None, true) => "other",
    };
    Message {
        id: "10".to_string(),
        user: User {
            id: USER_ID,
            username: Some("ann".to_string()),
            first_name: Some("Ann".to_string()),
            last_name: None,
        },
        chat: Chat::private(USER_ID),
        content: content.to_string(),
        message_type: message_type.to_string(),
        created_at: Utc::now(),
        attachment,
    }
}

pub fn text_message(text: &str) -> Message {
    message(text, None)
}

pub fn document_message(file_id: &str, file_name: &str, mime: &str) -> Message {
    message(
        "",
        Some(Attachment::Document {
            file_id: file_id.to_string(),
            file_name: Some(file_name.to_string()),
            mime_type: Some(mime.to_string()),
        }),
    )
}

pub fn voice_message(file_id: &str, duration_secs: u32) -> Message {
    message(
        "",
        Some(Attachment::Voice {
            file_id: file_id.to_string(),
            duration_secs,
            mime_type: Some("audio/ogg".to_string()),
        }),
    )
}
