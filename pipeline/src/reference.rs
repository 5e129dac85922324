//! Reference voice upload: the sample the synthesis service clones the reply voice from.

use speech::{reference_file_name, AudioConverter, TextToSpeech};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};
use vbot_core::{Bot, Message};

use crate::error::PipelineError;
use crate::workspace;

pub struct ReferenceVoice {
    bot: Arc<dyn Bot>,
    tts: Arc<dyn TextToSpeech>,
    converter: Arc<dyn AudioConverter>,
    work_dir: PathBuf,
}

impl ReferenceVoice {
    pub fn new(
        bot: Arc<dyn Bot>,
        tts: Arc<dyn TextToSpeech>,
        converter: Arc<dyn AudioConverter>,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            bot,
            tts,
            converter,
            work_dir: work_dir.into(),
        }
    }

    /// Fetches the message's audio, normalizes it and uploads it as `<user_id>.wav`.
    /// Returns the name the sample was stored under.
    #[instrument(skip(self, message), fields(user_id = message.user.id))]
    pub async fn upload(&self, message: &Message) -> Result<String, PipelineError> {
        let attachment = message
            .attachment
            .as_ref()
            .ok_or(PipelineError::MissingAttachment("audio"))?;
        let source = self.bot.get_file(attachment.file_id()).await?;
        let file_name = reference_file_name(&message.user.scope_id());

        let uploaded = async {
            let dir = workspace::create(&self.work_dir, "reference_").await?;
            let wav = dir.path().join("reference.wav");
            let result = async {
                self.converter.normalize(&source, &wav).await?;
                self.tts.upload_reference(&wav, &file_name).await?;
                Ok::<_, PipelineError>(())
            }
            .await;
            workspace::close(dir);
            result
        }
        .await;
        self.bot.release_file(&source).await;

        uploaded?;
        info!(file_name = %file_name, "step: reference voice uploaded");
        Ok(file_name)
    }
}
