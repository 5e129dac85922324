//! Shared test doubles for pipeline integration tests.
//!
//! Every collaborator records its calls so tests can assert on what was sent, in which order,
//! and which files were left behind.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use history::{HistoryConfig, HistoryManager, ProfileStore};
use llm_client::LlmClient;
use pipeline::{ReferenceVoice, TextPipeline, VoicePipeline};
use prompt::ChatMessage;
use speech::{AudioConverter, SpeechError, SpeechToText, TextToSpeech, Transcription};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use storage::FileRecordStore;
use tempfile::TempDir;
use vbot_core::{Attachment, Bot, Chat, Message, Result, TextFormat, User, VbotError};

pub const USER_ID: i64 = 42;

/// One call observed by [`MockBot`].
#[derive(Debug, Clone, PartialEq)]
pub enum BotEvent {
    Reply { text: String, format: TextFormat },
    Progress { text: String },
    Edit { message_id: String, text: String },
    Voice { path: PathBuf, existed: bool },
    Document { file_name: String },
    Photo { caption: String },
}

pub struct MockBot {
    pub events: Mutex<Vec<BotEvent>>,
    /// Inbound file served by `get_file`. When it exists, each call hands out a fresh copy in
    /// `download_dir`, like a transport that downloads; otherwise the path itself is returned.
    pub file_path: Mutex<PathBuf>,
    pub download_dir: PathBuf,
    pub released: Mutex<Vec<PathBuf>>,
    /// When set, `send_voice` fails with this transport error text.
    pub voice_error: Mutex<Option<String>>,
}

impl MockBot {
    pub fn new(file_path: PathBuf, download_dir: PathBuf) -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
            file_path: Mutex::new(file_path),
            download_dir,
            released: Mutex::new(Vec::new()),
            voice_error: Mutex::new(None),
        })
    }

    pub fn fail_voice_with(&self, error: &str) {
        *self.voice_error.lock().unwrap() = Some(error.to_string());
    }

    pub fn released(&self) -> Vec<PathBuf> {
        self.released.lock().unwrap().clone()
    }

    /// Files currently sitting in the download directory.
    pub fn downloads(&self) -> usize {
        match std::fs::read_dir(&self.download_dir) {
            Ok(entries) => entries.count(),
            Err(_) => 0,
        }
    }

    pub fn events(&self) -> Vec<BotEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn replies(&self) -> Vec<(String, TextFormat)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                BotEvent::Reply { text, format } => Some((text, format)),
                _ => None,
            })
            .collect()
    }

    pub fn edits(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                BotEvent::Edit { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: BotEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn get_file(&self, file_id: &str) -> Result<PathBuf> {
        let source = self.file_path.lock().unwrap().clone();
        if !source.exists() {
            return Ok(source);
        }
        tokio::fs::create_dir_all(&self.download_dir).await?;
        let target = self.download_dir.join(format!("{}_{}", file_id, self.released().len()));
        tokio::fs::copy(&source, &target).await?;
        Ok(target)
    }

    async fn release_file(&self, path: &Path) {
        self.released.lock().unwrap().push(path.to_path_buf());
        if path.starts_with(&self.download_dir) {
            let _ = tokio::fs::remove_file(path).await;
        }
    }

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.reply_formatted(message, text, TextFormat::Plain).await
    }

    async fn reply_formatted(&self, _message: &Message, text: &str, format: TextFormat) -> Result<()> {
        self.record(BotEvent::Reply {
            text: text.to_string(),
            format,
        });
        Ok(())
    }

    async fn reply_and_return_id(
        &self,
        _message: &Message,
        text: &str,
        _format: TextFormat,
    ) -> Result<String> {
        self.record(BotEvent::Progress {
            text: text.to_string(),
        });
        Ok("900".to_string())
    }

    async fn edit_message(
        &self,
        _chat: &Chat,
        message_id: &str,
        text: &str,
        _format: TextFormat,
    ) -> Result<()> {
        self.record(BotEvent::Edit {
            message_id: message_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_voice(&self, _message: &Message, voice: &Path) -> Result<()> {
        if let Some(error) = self.voice_error.lock().unwrap().clone() {
            return Err(VbotError::Bot(error));
        }
        self.record(BotEvent::Voice {
            path: voice.to_path_buf(),
            existed: voice.exists(),
        });
        Ok(())
    }

    async fn send_document(
        &self,
        _message: &Message,
        file_name: &str,
        _content: Vec<u8>,
        _caption: &str,
    ) -> Result<()> {
        self.record(BotEvent::Document {
            file_name: file_name.to_string(),
        });
        Ok(())
    }

    async fn send_photo(&self, _message: &Message, _photo: &Path, caption: &str) -> Result<()> {
        self.record(BotEvent::Photo {
            caption: caption.to_string(),
        });
        Ok(())
    }
}

/// Scripted language model: pops queued replies (`Err` = failure), then repeats the default.
pub struct MockLlm {
    pub replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    pub default_reply: String,
    pub calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockLlm {
    pub fn new(default_reply: &str) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::new()),
            default_reply: default_reply.to_string(),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn push_failure(&self, error: &str) {
        self.replies.lock().unwrap().push_back(Err(error.to_string()));
    }

    pub fn push_reply(&self, reply: &str) {
        self.replies.lock().unwrap().push_back(Ok(reply.to_string()));
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn complete(&self, messages: Vec<ChatMessage>) -> anyhow::Result<String> {
        self.calls.lock().unwrap().push(messages);
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(error)) => Err(anyhow::anyhow!(error)),
            None => Ok(self.default_reply.clone()),
        }
    }
}

/// Transcription stub returning a fixed result list.
pub struct MockStt {
    pub results: Mutex<std::result::Result<Vec<Transcription>, u16>>,
    pub calls: Mutex<Vec<Vec<String>>>,
}

impl MockStt {
    pub fn new(results: Vec<(&str, &str)>) -> Arc<Self> {
        Arc::new(Self {
            results: Mutex::new(Ok(results
                .into_iter()
                .map(|(code, text)| Transcription {
                    language_code: code.to_string(),
                    transcript: text.to_string(),
                })
                .collect())),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            results: Mutex::new(Err(status)),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl SpeechToText for MockStt {
    async fn transcribe(
        &self,
        audio: &Path,
        languages: &[String],
    ) -> std::result::Result<Vec<Transcription>, SpeechError> {
        assert!(audio.exists(), "normalized audio must exist while transcribing");
        self.calls.lock().unwrap().push(languages.to_vec());
        match &*self.results.lock().unwrap() {
            Ok(results) => Ok(results.clone()),
            Err(status) => Err(SpeechError::Status {
                status: *status,
                message: "stt unavailable".to_string(),
            }),
        }
    }
}

/// Synthesis stub writing small WAV files into `output_dir`.
pub struct MockTts {
    pub output_dir: PathBuf,
    pub fail: Mutex<bool>,
    /// `(text, language, reference_file)` per call.
    pub calls: Mutex<Vec<(String, String, String)>>,
    pub produced: Mutex<Vec<PathBuf>>,
    pub uploads: Mutex<Vec<String>>,
}

impl MockTts {
    pub fn new(output_dir: PathBuf) -> Arc<Self> {
        Arc::new(Self {
            output_dir,
            fail: Mutex::new(false),
            calls: Mutex::new(Vec::new()),
            produced: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(String, String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn produced(&self) -> Vec<PathBuf> {
        self.produced.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextToSpeech for MockTts {
    async fn synthesize(
        &self,
        text: &str,
        language: &str,
        reference_file: &str,
    ) -> std::result::Result<PathBuf, SpeechError> {
        self.calls.lock().unwrap().push((
            text.to_string(),
            language.to_string(),
            reference_file.to_string(),
        ));
        if *self.fail.lock().unwrap() {
            return Err(SpeechError::Status {
                status: 500,
                message: "tts down".to_string(),
            });
        }
        let index = self.produced.lock().unwrap().len();
        let path = self.output_dir.join(format!("speech_{}.wav", index));
        tokio::fs::write(&path, b"RIFF").await?;
        self.produced.lock().unwrap().push(path.clone());
        Ok(path)
    }

    async fn upload_reference(
        &self,
        audio: &Path,
        file_name: &str,
    ) -> std::result::Result<(), SpeechError> {
        assert!(audio.exists(), "reference audio must exist while uploading");
        self.uploads.lock().unwrap().push(file_name.to_string());
        Ok(())
    }
}

/// Converter stub: copies input to output; normalization can be made to fail.
pub struct MockConverter {
    pub fail_normalize: Mutex<bool>,
    pub normalized: Mutex<Vec<PathBuf>>,
}

impl MockConverter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            fail_normalize: Mutex::new(false),
            normalized: Mutex::new(Vec::new()),
        })
    }

    pub fn normalized(&self) -> Vec<PathBuf> {
        self.normalized.lock().unwrap().clone()
    }
}

#[async_trait]
impl AudioConverter for MockConverter {
    async fn normalize(&self, input: &Path, output: &Path) -> std::result::Result<(), SpeechError> {
        self.normalized.lock().unwrap().push(output.to_path_buf());
        if *self.fail_normalize.lock().unwrap() {
            tokio::fs::write(output, b"partial").await?;
            return Err(SpeechError::Conversion("unsupported codec".to_string()));
        }
        tokio::fs::copy(input, output).await?;
        Ok(())
    }

    async fn to_ogg_opus(&self, input: &Path, output: &Path) -> std::result::Result<(), SpeechError> {
        tokio::fs::copy(input, output).await?;
        Ok(())
    }
}

/// All collaborators wired over a temp data directory.
pub struct Harness {
    pub dir: TempDir,
    pub bot: Arc<MockBot>,
    pub llm: Arc<MockLlm>,
    pub stt: Arc<MockStt>,
    pub tts: Arc<MockTts>,
    pub converter: Arc<MockConverter>,
    pub history: Arc<HistoryManager>,
    pub text: Arc<TextPipeline>,
}

impl Harness {
    pub fn new(stt: Arc<MockStt>) -> Self {
        let dir = TempDir::new().expect("temp dir");
        let inbound = dir.path().join("inbound.oga");
        std::fs::write(&inbound, b"OggS-voice").unwrap();
        let synth_dir = dir.path().join("synth");
        std::fs::create_dir_all(&synth_dir).unwrap();

        let bot = MockBot::new(inbound, dir.path().join("downloads"));
        let llm = MockLlm::new("Hello. World.");
        let tts = MockTts::new(synth_dir);
        let converter = MockConverter::new();
        let history = Arc::new(HistoryManager::new(
            Arc::new(FileRecordStore::new(dir.path())),
            ProfileStore::new(dir.path(), None),
            HistoryConfig::default(),
        ));
        let text = Arc::new(TextPipeline::new(
            bot.clone(),
            llm.clone(),
            history.clone(),
            tts.clone(),
            converter.clone(),
        ));
        Self {
            dir,
            bot,
            llm,
            stt,
            tts,
            converter,
            history,
            text,
        }
    }

    pub fn work_dir(&self) -> PathBuf {
        self.dir.path().join("tmp")
    }

    pub fn voice_pipeline(&self) -> VoicePipeline {
        VoicePipeline::new(
            self.bot.clone(),
            self.text.clone(),
            self.stt.clone(),
            self.converter.clone(),
            vec!["en-US".to_string(), "cmn-Hans-CN".to_string()],
            self.work_dir(),
        )
    }

    pub fn reference_voice(&self) -> ReferenceVoice {
        ReferenceVoice::new(
            self.bot.clone(),
            self.tts.clone(),
            self.converter.clone(),
            self.work_dir(),
        )
    }

    /// Entries left in the scratch directory (0 when every run cleaned up).
    pub fn scratch_entries(&self) -> usize {
        match std::fs::read_dir(self.work_dir()) {
            Ok(entries) => entries.count(),
            Err(_) => 0,
        }
    }
}

pub fn message(content: &str, attachment: Option<Attachment>) -> Message {
    Message {
        id: "77".to_string(),
        user: User {
            id: USER_ID,
            username: Some("tester".to_string()),
            first_name: Some("Test".to_string()),
            last_name: None,
        },
        chat: Chat::private(USER_ID),
        content: content.to_string(),
        message_type: if attachment.is_some() { "voice" } else { "text" }.to_string(),
        created_at: Utc::now(),
        attachment,
    }
}

pub fn voice_message(duration_secs: u32) -> Message {
    message(
        "",
        Some(Attachment::Voice {
            file_id: "voice-file".to_string(),
            duration_secs,
            mime_type: Some("audio/ogg".to_string()),
        }),
    )
}
