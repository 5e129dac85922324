//! Speech-to-text collaborator.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, instrument};

use crate::error::SpeechError;

/// One detected-language alternative of a transcription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcription {
    /// BCP-47 code as reported by the service (e.g. `en-US`, `cmn-Hans-CN`).
    pub language_code: String,
    pub transcript: String,
}

#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribes `audio` (16 kHz mono PCM WAV) trying every code in `languages`.
    /// The service may return several results, one per detected language.
    async fn transcribe(
        &self,
        audio: &Path,
        languages: &[String],
    ) -> Result<Vec<Transcription>, SpeechError>;
}

#[derive(Debug, Deserialize)]
struct TranscribeResponse {
    #[serde(default)]
    results: Vec<TranscribeResult>,
}

#[derive(Debug, Deserialize)]
struct TranscribeResult {
    language_code: String,
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    transcript: String,
}

/// Client of the transcription service: `POST {base_url}/transcribe` with multipart fields
/// `file` (the WAV) and `languages` (comma separated). The first alternative of each result is used.
#[derive(Debug, Clone)]
pub struct HttpSpeechToText {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSpeechToText {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SpeechToText for HttpSpeechToText {
    #[instrument(skip(self, languages), fields(audio = %audio.display(), candidates = languages.len()))]
    async fn transcribe(
        &self,
        audio: &Path,
        languages: &[String],
    ) -> Result<Vec<Transcription>, SpeechError> {
        let bytes = tokio::fs::read(audio).await?;
        let file_name = audio
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio.wav".to_string());
        let form = Form::new()
            .part(
                "file",
                Part::bytes(bytes).file_name(file_name).mime_str("audio/wav")?,
            )
            .text("languages", languages.join(","));

        let response = self
            .client
            .post(format!("{}/transcribe", self.base_url))
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SpeechError::from_response(response).await);
        }

        let body: TranscribeResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::Response(e.to_string()))?;
        let transcriptions: Vec<Transcription> = body
            .results
            .into_iter()
            .filter_map(|result| {
                let alternative = result.alternatives.into_iter().next()?;
                Some(Transcription {
                    language_code: result.language_code,
                    transcript: alternative.transcript,
                })
            })
            .collect();

        info!(results = transcriptions.len(), "Transcription received");
        Ok(transcriptions)
    }
}
