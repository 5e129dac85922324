//! Audio conversion through ffmpeg.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::error::SpeechError;

/// Sample rate of normalized audio handed to transcription and reference upload.
pub const NORMALIZED_SAMPLE_RATE: u32 = 16_000;

#[async_trait]
pub trait AudioConverter: Send + Sync {
    /// Converts any input to WAV: 16 kHz, one channel, 16-bit little-endian PCM.
    async fn normalize(&self, input: &Path, output: &Path) -> Result<(), SpeechError>;

    /// Encodes a WAV as OGG/Opus, the format voice messages are delivered in.
    async fn to_ogg_opus(&self, input: &Path, output: &Path) -> Result<(), SpeechError>;
}

#[derive(Debug, Clone)]
pub struct FfmpegConverter {
    binary: PathBuf,
}

impl FfmpegConverter {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    async fn run(&self, args: Vec<String>) -> Result<(), SpeechError> {
        debug!(binary = %self.binary.display(), args = ?args, "Running ffmpeg");
        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                SpeechError::Conversion(format!("failed to run {}: {}", self.binary.display(), e))
            })?;

        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        let tail: Vec<&str> = stderr.lines().rev().take(3).collect();
        Err(SpeechError::Conversion(format!(
            "exit code {}: {}",
            output.status.code().unwrap_or(-1),
            tail.into_iter().rev().collect::<Vec<_>>().join(" | ")
        )))
    }
}

impl Default for FfmpegConverter {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

#[async_trait]
impl AudioConverter for FfmpegConverter {
    #[instrument(skip(self), fields(input = %input.display()))]
    async fn normalize(&self, input: &Path, output: &Path) -> Result<(), SpeechError> {
        self.run(vec![
            "-y".into(),
            "-i".into(),
            path_arg(input),
            "-ar".into(),
            NORMALIZED_SAMPLE_RATE.to_string(),
            "-ac".into(),
            "1".into(),
            "-c:a".into(),
            "pcm_s16le".into(),
            path_arg(output),
        ])
        .await
    }

    #[instrument(skip(self), fields(input = %input.display()))]
    async fn to_ogg_opus(&self, input: &Path, output: &Path) -> Result<(), SpeechError> {
        self.run(vec![
            "-y".into(),
            "-i".into(),
            path_arg(input),
            "-c:a".into(),
            "libopus".into(),
            "-strict".into(),
            "-2".into(),
            "-f".into(),
            "ogg".into(),
            path_arg(output),
        ])
        .await
    }
}
