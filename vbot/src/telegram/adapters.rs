//! Converts teloxide users and messages into core types, including voice and document
//! attachments.

use std::fmt::Display;
use teloxide::types::FileMeta;
use vbot_core::{Attachment, Chat, ChatKind, Message, ToCoreMessage, ToCoreUser, User};

/// Telegram user to core user.
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

/// Telegram message to core message.
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

fn mime_string<M: Display>(mime: &Option<M>) -> Option<String> {
    mime.as_ref().map(|m| m.to_string())
}

fn document<M: Display>(file: &FileMeta, file_name: &Option<String>, mime: &Option<M>) -> Attachment {
    Attachment::Document {
        file_id: file.id.0.clone(),
        file_name: file_name.clone(),
        mime_type: mime_string(mime),
    }
}

fn chat_kind(chat: &teloxide::types::Chat) -> ChatKind {
    if chat.is_private() {
        ChatKind::Private
    } else if chat.is_channel() {
        ChatKind::Channel
    } else {
        ChatKind::Group
    }
}

impl<'a> TelegramMessageWrapper<'a> {
    /// Voice note, uploaded document or audio file carried by the message.
    fn attachment(&self) -> Option<Attachment> {
        let msg = self.0;
        if let Some(voice) = msg.voice() {
            return Some(Attachment::Voice {
                file_id: voice.file.id.0.clone(),
                duration_secs: voice.duration.seconds(),
                mime_type: mime_string(&voice.mime_type),
            });
        }
        if let Some(doc) = msg.document() {
            return Some(document(&doc.file, &doc.file_name, &doc.mime_type));
        }
        msg.audio()
            .map(|audio| document(&audio.file, &audio.file_name, &audio.mime_type))
    }
}

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        let attachment = self.attachment();
        let content = self.0.text().unwrap_or("").to_string();
        let message_type = match (&attachment, content.is_empty()) {
            (Some(Attachment::Voice { .. }), _) => "voice",
            (Some(Attachment::Document { .. }), _) => "document",
            (None, false) => "text",
            (None, true) => "other",
        };

        Message {
            id: self.0.id.to_string(),
            user: self
                .0
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or_else(|| User {
                    id: 0,
                    username: None,
                    first_name: None,
                    last_name: None,
                }),
            chat: Chat {
                id: self.0.chat.id.0,
                kind: chat_kind(&self.0.chat),
            },
            content,
            message_type: message_type.to_string(),
            created_at: chrono::Utc::now(),
            attachment,
        }
    }
}
