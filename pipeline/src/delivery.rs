//! Reply delivery outcome and the voice → text fallback policy.

use speech::SpeechError;
use thiserror::Error;
use vbot_core::{is_voice_forbidden, VbotError};

/// How a reply reached the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveredAs {
    Voice,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub delivered_as: DeliveredAs,
}

impl Delivery {
    pub fn voice() -> Self {
        Self {
            delivered_as: DeliveredAs::Voice,
        }
    }

    pub fn text() -> Self {
        Self {
            delivered_as: DeliveredAs::Text,
        }
    }
}

/// Why a voice reply could not be delivered.
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("speech synthesis failed: {0}")]
    Synthesis(SpeechError),

    #[error("voice encoding failed: {0}")]
    Encoding(SpeechError),

    #[error("voice delivery failed: {0}")]
    Delivery(VbotError),
}

impl VoiceError {
    /// The recipient's privacy settings reject voice messages.
    pub fn is_forbidden(&self) -> bool {
        match self {
            VoiceError::Delivery(e) => is_voice_forbidden(e),
            _ => false,
        }
    }
}

/// What to send when voice delivery failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackPlan {
    /// Send the privacy-settings hint before the text reply.
    pub privacy_hint: bool,
}

/// Decides the fallback for a voice attempt: `None` when the voice reply went out, otherwise
/// the text reply is always sent, preceded by the privacy hint when voice is forbidden.
pub fn fallback_policy(attempt: &Result<(), VoiceError>) -> Option<FallbackPlan> {
    match attempt {
        Ok(()) => None,
        Err(e) => Some(FallbackPlan {
            privacy_hint: e.is_forbidden(),
        }),
    }
}
