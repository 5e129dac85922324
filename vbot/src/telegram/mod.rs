//! Telegram layer: teloxide message adapters, the [`vbot_core::Bot`] implementation and the REPL
//! runner.

mod adapters;
mod bot_adapter;
mod runner;

pub use adapters::{TelegramMessageWrapper, TelegramUserWrapper};
pub use bot_adapter::TelegramBotAdapter;
pub use runner::run_repl;
