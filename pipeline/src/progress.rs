//! Progress message for the voice pipeline: one status line, sent once and edited in place.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use vbot_core::{Bot, Message, TextFormat};

const BAR_CELLS: usize = 5;

/// Pipeline stage shown in the progress line. Stages after transcription carry the detected language.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Reading,
    Converting,
    Transcribing,
    Thinking { language: String },
    Synthesizing { language: String },
    Done { language: String, elapsed: Duration },
}

impl Stage {
    fn filled_cells(&self) -> usize {
        match self {
            Stage::Reading => 0,
            Stage::Converting => 1,
            Stage::Transcribing => 2,
            Stage::Thinking { .. } => 3,
            Stage::Synthesizing { .. } => 4,
            Stage::Done { .. } => BAR_CELLS,
        }
    }

    /// Status line, e.g. `[███  ] [en-US] Thinking..`.
    pub fn render(&self) -> String {
        let bar = format!("[{:<width$}]", "█".repeat(self.filled_cells()), width = BAR_CELLS);
        match self {
            Stage::Reading => format!("{} Reading the reference voice..", bar),
            Stage::Converting => format!("{} Voice conversion..", bar),
            Stage::Transcribing => format!("{} Voice to text transcription..", bar),
            Stage::Thinking { language } => format!("{} [{}] Thinking..", bar, language),
            Stage::Synthesizing { language } => format!("{} [{}] Voice synthesis..", bar, language),
            Stage::Done { language, elapsed } => format!(
                "{} [{}] Done in {:.1} sec.",
                bar,
                language,
                elapsed.as_secs_f64()
            ),
        }
    }
}

/// Owns the progress message of one pipeline run. Display is best-effort: if the initial send
/// or an edit fails the run continues and the failure is only logged.
pub struct ProgressReporter {
    bot: Arc<dyn Bot>,
    message: Message,
    progress_id: Option<String>,
}

impl ProgressReporter {
    /// Sends the first status line as a reply to `message`.
    pub async fn start(bot: Arc<dyn Bot>, message: &Message, stage: Stage) -> Self {
        let progress_id = match bot
            .reply_and_return_id(message, &stage.render(), TextFormat::Code)
            .await
        {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(error = %e, chat_id = message.chat.id, "Failed to send progress message");
                None
            }
        };
        Self {
            bot,
            message: message.clone(),
            progress_id,
        }
    }

    /// Replaces the status line with `stage`. Awaited, so edits stay ordered with later sends.
    pub async fn update(&self, stage: Stage) {
        let Some(id) = &self.progress_id else {
            return;
        };
        let text = stage.render();
        debug!(progress_id = %id, status = %text, "step: progress update");
        if let Err(e) = self
            .bot
            .edit_message(&self.message.chat, id, &text, TextFormat::Code)
            .await
        {
            warn!(error = %e, progress_id = %id, "Failed to edit progress message");
        }
    }
}
