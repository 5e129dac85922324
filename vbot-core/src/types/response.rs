//! Outcome of a handler's `handle` phase.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Not handled here; the next handler gets the message.
    Continue,
    /// Same as `Continue`, but the handler looked at the message and chose to pass.
    Ignore,
    /// Handled; the handler already delivered whatever it had to send.
    Stop,
    /// Handled with this text delivered to the user. `after` hooks see the text.
    Reply(String),
}

impl HandlerResponse {
    /// Terminal responses end the handle phase.
    pub fn is_terminal(&self) -> bool {
        matches!(self, HandlerResponse::Stop | HandlerResponse::Reply(_))
    }

    pub fn reply_text(&self) -> Option<&str> {
        match self {
            HandlerResponse::Reply(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for HandlerResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerResponse::Continue => f.write_str("continue"),
            HandlerResponse::Ignore => f.write_str("ignore"),
            HandlerResponse::Stop => f.write_str("stop"),
            HandlerResponse::Reply(text) => write!(f, "reply({} chars)", text.chars().count()),
        }
    }
}
