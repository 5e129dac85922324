//! # Speech
//!
//! Collaborators of the voice pipeline, each behind a trait so the pipeline can be tested
//! without network or ffmpeg:
//!
//! - [`SpeechToText`] / [`HttpSpeechToText`]: transcription over a candidate language set
//! - [`TextToSpeech`] / [`HttpTextToSpeech`]: synthesis with a per-user reference voice
//! - [`AudioConverter`] / [`FfmpegConverter`]: 16 kHz mono PCM normalization, OGG/Opus encoding
//!
//! ## External interactions
//!
//! - **STT service**: `POST {base}/transcribe` (multipart)
//! - **TTS service**: `POST {base}/tts` (JSON), `POST {base}/upload_reference` (multipart)
//! - **ffmpeg**: spawned via `tokio::process`

mod audio;
mod error;
mod stt;
mod tts;

pub use audio::{AudioConverter, FfmpegConverter, NORMALIZED_SAMPLE_RATE};
pub use error::SpeechError;
pub use stt::{HttpSpeechToText, SpeechToText, Transcription};
pub use tts::{reference_file_name, HttpTextToSpeech, TextToSpeech};
