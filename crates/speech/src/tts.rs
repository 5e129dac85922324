//! Speech synthesis collaborator.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::SpeechError;

/// Name under which a user's reference voice sample is stored on the TTS service.
pub fn reference_file_name(user_id: &str) -> String {
    format!("{}.wav", user_id)
}

#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Synthesizes `text` in `language` with the voice of `reference_file` and returns the path
    /// of the WAV written locally. The caller owns (and deletes) the returned file.
    async fn synthesize(
        &self,
        text: &str,
        language: &str,
        reference_file: &str,
    ) -> Result<PathBuf, SpeechError>;

    /// Uploads a normalized WAV as the reference voice sample named `file_name`.
    async fn upload_reference(&self, audio: &Path, file_name: &str) -> Result<(), SpeechError>;
}

/// Client of the synthesis service. Audio is saved as `speech_<uuid>.wav` under `output_dir`.
#[derive(Debug, Clone)]
pub struct HttpTextToSpeech {
    client: reqwest::Client,
    base_url: String,
    output_dir: PathBuf,
}

impl HttpTextToSpeech {
    pub fn new(base_url: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait]
impl TextToSpeech for HttpTextToSpeech {
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    async fn synthesize(
        &self,
        text: &str,
        language: &str,
        reference_file: &str,
    ) -> Result<PathBuf, SpeechError> {
        let payload = json!({
            "text": text,
            "language": language,
            "reference_file": reference_file,
        });
        let response = self
            .client
            .post(format!("{}/tts", self.base_url))
            .json(&payload)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SpeechError::from_response(response).await);
        }
        let audio = response.bytes().await?;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self
            .output_dir
            .join(format!("speech_{}.wav", Uuid::new_v4()));
        tokio::fs::write(&path, &audio).await?;
        info!(path = %path.display(), bytes = audio.len(), "Speech synthesized");
        Ok(path)
    }

    #[instrument(skip(self), fields(audio = %audio.display()))]
    async fn upload_reference(&self, audio: &Path, file_name: &str) -> Result<(), SpeechError> {
        let bytes = tokio::fs::read(audio).await?;
        let form = Form::new()
            .part(
                "file",
                Part::bytes(bytes)
                    .file_name(file_name.to_string())
                    .mime_str("audio/wav")?,
            )
            .text("filename", file_name.to_string());

        let response = self
            .client
            .post(format!("{}/upload_reference", self.base_url))
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SpeechError::from_response(response).await);
        }
        info!(file_name = %file_name, "Reference voice uploaded");
        Ok(())
    }
}
