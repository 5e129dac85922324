use history::HistoryError;
use speech::SpeechError;
use thiserror::Error;
use vbot_core::VbotError;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Transport error: {0}")]
    Bot(#[from] VbotError),

    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),

    #[error("History error: {0}")]
    History(#[from] HistoryError),

    #[error("Language model error: {0}")]
    Llm(#[source] anyhow::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not available: {0}")]
    FileUnavailable(String),

    #[error("No speech recognized")]
    NoSpeech,

    #[error("Message has no {0} attachment")]
    MissingAttachment(&'static str),
}

impl From<PipelineError> for VbotError {
    fn from(error: PipelineError) -> Self {
        match error {
            PipelineError::Bot(e) => e,
            other => VbotError::Pipeline(other.to_string()),
        }
    }
}
