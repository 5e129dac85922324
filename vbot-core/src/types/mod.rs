//! Core message model and the [`Handler`] trait.

mod attachment;
mod chat;
mod convert;
mod handler;
mod message;
mod response;
mod user;

pub use attachment::Attachment;
pub use chat::{Chat, ChatKind};
pub use convert::{ToCoreMessage, ToCoreUser};
pub use handler::Handler;
pub use message::Message;
pub use response::HandlerResponse;
pub use user::User;
