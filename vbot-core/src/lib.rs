//! # vbot-core
//!
//! Core types and traits for the voice bot: [`Bot`] (chat transport), [`Handler`], message, user and
//! attachment types, errors, and tracing initialization. Transport-agnostic; the teloxide adapter lives
//! in the `vbot` crate and the pipelines in `pipeline` only see these types.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::{is_voice_forbidden, parse_message_id, Bot, TextFormat, VOICE_FORBIDDEN_MARKER};
pub use error::{Result, VbotError};
pub use logger::init_tracing;
pub use types::{
    Attachment, Chat, ChatKind, Handler, HandlerResponse, Message, ToCoreMessage, ToCoreUser, User,
};
