//! Wraps teloxide::Bot and implements [`vbot_core::Bot`]. Production code sends messages via
//! Telegram; tests substitute another Bot impl.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{ChatId, FileId, InputFile, MessageId, ParseMode, ReplyParameters};
use teloxide::utils::markdown::code_inline;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument, warn};
use vbot_core::{parse_message_id, Bot as CoreBot, Chat, Message, Result, TextFormat, VbotError};

fn bot_error(e: impl std::fmt::Display) -> VbotError {
    VbotError::Bot(e.to_string())
}

/// Legacy Markdown: tolerant of the loose markup language models produce.
#[allow(deprecated)]
fn model_markdown() -> ParseMode {
    ParseMode::Markdown
}

/// Keeps only characters that are safe in a file name.
fn file_name_part(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || *c == '.')
        .collect()
}

/// Thin wrapper around teloxide::Bot that implements core's Bot trait.
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
    download_dir: PathBuf,
}

impl TelegramBotAdapter {
    /// Files that are not directly readable (hosted Bot API) are downloaded into `download_dir`.
    pub fn new(bot: teloxide::Bot, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            bot,
            download_dir: download_dir.into(),
        }
    }

    fn reply_parameters(message: &Message) -> Result<ReplyParameters> {
        Ok(ReplyParameters::new(MessageId(parse_message_id(&message.id)?)))
    }

    async fn send_text(
        &self,
        message: &Message,
        text: &str,
        format: TextFormat,
    ) -> Result<teloxide::types::Message> {
        let chat_id = ChatId(message.chat.id);
        let reply = Self::reply_parameters(message)?;
        match format {
            TextFormat::Plain => self
                .bot
                .send_message(chat_id, text)
                .reply_parameters(reply)
                .await
                .map_err(bot_error),
            TextFormat::Code => self
                .bot
                .send_message(chat_id, code_inline(text))
                .parse_mode(ParseMode::MarkdownV2)
                .reply_parameters(reply)
                .await
                .map_err(bot_error),
            TextFormat::Markdown => {
                let sent = self
                    .bot
                    .send_message(chat_id, text)
                    .parse_mode(model_markdown())
                    .reply_parameters(reply.clone())
                    .await;
                match sent {
                    Ok(sent) => Ok(sent),
                    Err(e) => {
                        warn!(chat_id = message.chat.id, error = %e, "Markdown rejected, resending as plain text");
                        self.bot
                            .send_message(chat_id, text)
                            .reply_parameters(reply)
                            .await
                            .map_err(bot_error)
                    }
                }
            }
        }
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    /// With a local Bot API server the returned path is readable directly; otherwise the file is
    /// downloaded into the download directory.
    #[instrument(skip(self))]
    async fn get_file(&self, file_id: &str) -> Result<PathBuf> {
        let file = self
            .bot
            .get_file(FileId(file_id.to_string()))
            .await
            .map_err(bot_error)?;

        let remote = Path::new(&file.path);
        if remote.is_absolute() && tokio::fs::try_exists(remote).await.unwrap_or(false) {
            debug!(path = %file.path, "File available locally");
            return Ok(remote.to_path_buf());
        }

        tokio::fs::create_dir_all(&self.download_dir).await?;
        let base_name = remote
            .file_name()
            .map(|n| file_name_part(&n.to_string_lossy()))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "file".to_string());
        let target = self
            .download_dir
            .join(format!("{}_{}", file_name_part(file_id), base_name));

        let mut destination = tokio::fs::File::create(&target).await?;
        self.bot
            .download_file(&file.path, &mut destination)
            .await
            .map_err(bot_error)?;
        destination.flush().await?;
        debug!(path = %target.display(), "File downloaded");
        Ok(target)
    }

    /// Deletes copies this adapter downloaded. Paths served by a local Bot API server live
    /// outside the download directory and are not touched.
    async fn release_file(&self, path: &Path) {
        if !path.starts_with(&self.download_dir) {
            return;
        }
        match tokio::fs::remove_file(path).await {
            Ok(()) => debug!(path = %path.display(), "Downloaded file removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove downloaded file"),
        }
    }

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.send_text(message, text, TextFormat::Plain).await?;
        Ok(())
    }

    async fn reply_formatted(&self, message: &Message, text: &str, format: TextFormat) -> Result<()> {
        self.send_text(message, text, format).await?;
        Ok(())
    }

    async fn reply_and_return_id(
        &self,
        message: &Message,
        text: &str,
        format: TextFormat,
    ) -> Result<String> {
        let sent = self.send_text(message, text, format).await?;
        Ok(sent.id.to_string())
    }

    async fn edit_message(
        &self,
        chat: &Chat,
        message_id: &str,
        text: &str,
        format: TextFormat,
    ) -> Result<()> {
        let id = MessageId(parse_message_id(message_id)?);
        let chat_id = ChatId(chat.id);
        let edited = match format {
            TextFormat::Plain => self.bot.edit_message_text(chat_id, id, text).await,
            TextFormat::Code => {
                self.bot
                    .edit_message_text(chat_id, id, code_inline(text))
                    .parse_mode(ParseMode::MarkdownV2)
                    .await
            }
            TextFormat::Markdown => {
                match self
                    .bot
                    .edit_message_text(chat_id, id, text)
                    .parse_mode(model_markdown())
                    .await
                {
                    Ok(edited) => Ok(edited),
                    Err(_) => self.bot.edit_message_text(chat_id, id, text).await,
                }
            }
        };
        edited.map_err(bot_error)?;
        Ok(())
    }

    async fn send_voice(&self, message: &Message, voice: &Path) -> Result<()> {
        self.bot
            .send_voice(ChatId(message.chat.id), InputFile::file(voice.to_path_buf()))
            .reply_parameters(Self::reply_parameters(message)?)
            .await
            .map_err(bot_error)?;
        Ok(())
    }

    async fn send_document(
        &self,
        message: &Message,
        file_name: &str,
        content: Vec<u8>,
        caption: &str,
    ) -> Result<()> {
        self.bot
            .send_document(
                ChatId(message.chat.id),
                InputFile::memory(content).file_name(file_name.to_string()),
            )
            .caption(caption)
            .reply_parameters(Self::reply_parameters(message)?)
            .await
            .map_err(bot_error)?;
        Ok(())
    }

    async fn send_photo(&self, message: &Message, photo: &Path, caption: &str) -> Result<()> {
        self.bot
            .send_photo(ChatId(message.chat.id), InputFile::file(photo.to_path_buf()))
            .caption(caption)
            .reply_parameters(Self::reply_parameters(message)?)
            .await
            .map_err(bot_error)?;
        Ok(())
    }
}
