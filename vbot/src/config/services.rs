//! Speech services, audio converter and bundled asset locations.

use anyhow::Result;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ServicesConfig {
    /// STT_API_URL
    pub stt_api_url: String,
    /// TTS_API_URL
    pub tts_api_url: String,
    /// FFMPEG_PATH
    pub ffmpeg_path: PathBuf,
    /// LANGUAGES_FILE: candidate transcription languages, one BCP-47 tag per line.
    pub languages_file: PathBuf,
    /// GREETING_FILE
    pub greeting_file: PathBuf,
    /// GREETING_IMAGE
    pub greeting_image: PathBuf,
    /// ALLOWED_USERS_FILE; unset means every user is allowed.
    pub allowed_users_file: Option<PathBuf>,
}

fn path_var(name: &str, default: &str) -> PathBuf {
    PathBuf::from(env::var(name).unwrap_or_else(|_| default.to_string()))
}

impl ServicesConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            stt_api_url: env::var("STT_API_URL")
                .unwrap_or_else(|_| "http://localhost:5001".to_string()),
            tts_api_url: env::var("TTS_API_URL")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            ffmpeg_path: path_var("FFMPEG_PATH", "ffmpeg"),
            languages_file: path_var("LANGUAGES_FILE", "./BCP-47.txt"),
            greeting_file: path_var("GREETING_FILE", "./greeting.txt"),
            greeting_image: path_var("GREETING_IMAGE", "./voclone.png"),
            allowed_users_file: env::var("ALLOWED_USERS_FILE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    pub fn validate(&self) -> Result<()> {
        for (name, url) in [("STT_API_URL", &self.stt_api_url), ("TTS_API_URL", &self.tts_api_url)] {
            if reqwest::Url::parse(url).is_err() {
                anyhow::bail!("{} is not a valid URL: {}", name, url);
            }
        }
        Ok(())
    }
}
