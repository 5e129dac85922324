//! # Pipeline
//!
//! Turns an inbound user message into a reply.
//!
//! - [`TextPipeline`]: prompt from profile + history, model call, turn recorded, then voice
//!   delivery with a text fallback ([`fallback_policy`]).
//! - [`VoicePipeline`]: validate → fetch → normalize → transcribe, then the text pipeline once
//!   per detected language, with a [`ProgressReporter`] message edited in place.
//! - [`ReferenceVoice`]: normalizes and uploads a user's reference voice sample.
//!
//! ## External interactions
//!
//! - **Chat transport**: [`vbot_core::Bot`]
//! - **Language model**: [`llm_client::LlmClient`]
//! - **Speech**: [`speech::SpeechToText`], [`speech::TextToSpeech`], [`speech::AudioConverter`]

mod delivery;
mod error;
mod language;
pub mod messages;
mod progress;
mod reference;
mod text_pipeline;
mod voice_pipeline;
mod workspace;

pub use delivery::{fallback_policy, DeliveredAs, Delivery, FallbackPlan, VoiceError};
pub use error::PipelineError;
pub use language::{normalize_language_code, prepare_for_voice, primary_subtag, DEFAULT_LANGUAGE};
pub use progress::{ProgressReporter, Stage};
pub use reference::ReferenceVoice;
pub use text_pipeline::{TextOutcome, TextPipeline};
pub use voice_pipeline::{validate_duration, DurationCheck, VoiceOutcome, VoicePipeline};
