//! Voice pipeline: validate → fetch → normalize → transcribe, then generate and deliver once
//! per detected language. Each stage edits the progress line before it runs.

use speech::{AudioConverter, SpeechToText};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument, warn};
use vbot_core::{Attachment, Bot, Message};

use crate::delivery::Delivery;
use crate::error::PipelineError;
use crate::language::{normalize_language_code, primary_subtag};
use crate::messages::{DURATION_TOO_LONG, DURATION_TOO_SHORT, FILE_ACCESS_APOLOGY, VOICE_APOLOGY};
use crate::progress::{ProgressReporter, Stage};
use crate::text_pipeline::TextPipeline;
use crate::workspace;

const MIN_DURATION_SECS: u32 = 1;
const MAX_DURATION_SECS: u32 = 60;

/// Result of the duration check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationCheck {
    Accepted,
    TooShort,
    TooLong,
}

impl DurationCheck {
    /// Reply sent for a rejected voice message.
    pub fn rejection(&self) -> Option<&'static str> {
        match self {
            DurationCheck::Accepted => None,
            DurationCheck::TooShort => Some(DURATION_TOO_SHORT),
            DurationCheck::TooLong => Some(DURATION_TOO_LONG),
        }
    }
}

/// Voice notes must last between 1 and 60 seconds inclusive.
pub fn validate_duration(duration_secs: u32) -> DurationCheck {
    if duration_secs < MIN_DURATION_SECS {
        DurationCheck::TooShort
    } else if duration_secs > MAX_DURATION_SECS {
        DurationCheck::TooLong
    } else {
        DurationCheck::Accepted
    }
}

/// Result of [`VoicePipeline::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceOutcome {
    /// Duration out of bounds; only the rejection reply was sent.
    Rejected(DurationCheck),
    /// The audio could not be fetched.
    FileUnavailable,
    /// A stage failed; the generic apology was sent.
    Failed,
    /// One delivery per detected language, in the order the recognizer returned them.
    Completed { replies: Vec<Delivery> },
}

pub struct VoicePipeline {
    bot: Arc<dyn Bot>,
    text: Arc<TextPipeline>,
    stt: Arc<dyn SpeechToText>,
    converter: Arc<dyn AudioConverter>,
    languages: Vec<String>,
    work_dir: PathBuf,
}

impl VoicePipeline {
    /// `languages` is the candidate set passed to transcription; scratch directories are
    /// created under `work_dir`.
    pub fn new(
        bot: Arc<dyn Bot>,
        text: Arc<TextPipeline>,
        stt: Arc<dyn SpeechToText>,
        converter: Arc<dyn AudioConverter>,
        languages: Vec<String>,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            bot,
            text,
            stt,
            converter,
            languages,
            work_dir: work_dir.into(),
        }
    }

    /// Runs the whole pipeline for a voice message. Stage failures are answered with a reply
    /// and reported in the outcome; only transport failures while replying are errors.
    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    pub async fn handle(&self, message: &Message) -> Result<VoiceOutcome, PipelineError> {
        let (file_id, duration_secs) = match &message.attachment {
            Some(Attachment::Voice {
                file_id,
                duration_secs,
                ..
            }) => (file_id.as_str(), *duration_secs),
            _ => return Err(PipelineError::MissingAttachment("voice")),
        };

        let check = validate_duration(duration_secs);
        if let Some(reply) = check.rejection() {
            info!(duration_secs, "Voice message rejected by duration");
            self.bot.reply_to(message, reply).await?;
            return Ok(VoiceOutcome::Rejected(check));
        }

        let progress = ProgressReporter::start(self.bot.clone(), message, Stage::Reading).await;

        let source = match self.fetch(file_id).await {
            Ok(path) => path,
            Err(e) => {
                warn!(file_id = %file_id, error = %e, "Voice file not accessible");
                self.bot.reply_to(message, FILE_ACCESS_APOLOGY).await?;
                return Ok(VoiceOutcome::FileUnavailable);
            }
        };

        let started = Instant::now();
        let outcome = self.run_stages(message, &source, &progress, started).await;
        self.bot.release_file(&source).await;
        match outcome {
            Ok(replies) => {
                info!(replies = replies.len(), elapsed_ms = started.elapsed().as_millis() as u64, "Voice message processed");
                Ok(VoiceOutcome::Completed { replies })
            }
            Err(e) => {
                error!(error = %e, "Voice pipeline failed");
                self.bot.reply_to(message, VOICE_APOLOGY).await?;
                Ok(VoiceOutcome::Failed)
            }
        }
    }

    /// Resolves the transport reference to a local file that exists.
    async fn fetch(&self, file_id: &str) -> Result<PathBuf, PipelineError> {
        let path = self.bot.get_file(file_id).await?;
        if tokio::fs::try_exists(&path).await? {
            Ok(path)
        } else {
            Err(PipelineError::FileUnavailable(path.display().to_string()))
        }
    }

    async fn run_stages(
        &self,
        message: &Message,
        source: &Path,
        progress: &ProgressReporter,
        started: Instant,
    ) -> Result<Vec<Delivery>, PipelineError> {
        progress.update(Stage::Converting).await;
        let dir = workspace::create(&self.work_dir, "voice_").await?;
        let result = self
            .transcribe_and_reply(message, source, dir.path(), progress, started)
            .await;
        workspace::close(dir);
        result
    }

    async fn transcribe_and_reply(
        &self,
        message: &Message,
        source: &Path,
        dir: &Path,
        progress: &ProgressReporter,
        started: Instant,
    ) -> Result<Vec<Delivery>, PipelineError> {
        let wav = dir.join("audio.wav");
        self.converter.normalize(source, &wav).await?;

        progress.update(Stage::Transcribing).await;
        let transcriptions: Vec<_> = self
            .stt
            .transcribe(&wav, &self.languages)
            .await?
            .into_iter()
            .filter(|t| !t.transcript.trim().is_empty())
            .collect();
        if transcriptions.is_empty() {
            return Err(PipelineError::NoSpeech);
        }

        let user_id = message.user.scope_id();
        let mut replies = Vec::with_capacity(transcriptions.len());
        for transcription in transcriptions {
            let display_code = normalize_language_code(&transcription.language_code);
            let language = primary_subtag(&display_code);
            info!(language = %display_code, chars = transcription.transcript.chars().count(), "step: transcript received");

            progress
                .update(Stage::Thinking {
                    language: display_code.clone(),
                })
                .await;
            let response = self
                .text
                .generate(&user_id, &transcription.transcript, &language)
                .await?;

            progress
                .update(Stage::Synthesizing {
                    language: display_code.clone(),
                })
                .await;
            replies.push(self.text.deliver(message, &response, &language).await?);

            progress
                .update(Stage::Done {
                    language: display_code,
                    elapsed: started.elapsed(),
                })
                .await;
        }
        Ok(replies)
    }
}
