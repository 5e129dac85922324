//! Conversion from transport types into the core model.
//!
//! The teloxide adapter implements these on thin wrappers around its own
//! message and user types, so the pipelines never see transport structs.

use super::{message::Message, user::User};

pub trait ToCoreUser: Send + Sync {
    fn to_core(&self) -> User;
}

pub trait ToCoreMessage: Send + Sync {
    fn to_core(&self) -> Message;
}
