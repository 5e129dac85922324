//! # vbot
//!
//! Voice-first Telegram assistant. A voice note is transcribed, answered by a language model
//! and spoken back in the user's own reference voice; typed text takes the same path minus
//! transcription. Wires the teloxide transport, handler chain, history and pipelines, loads
//! config from env and runs the REPL.

pub mod assets;
pub mod chain;
pub mod cli;
pub mod components;
pub mod config;
pub mod handlers;
pub mod runner;
pub mod telegram;
pub mod user_locks;

pub use chain::HandlerChain;
pub use cli::{load_config, load_store_config, render_history, Cli, Commands};
pub use components::{
    build_bot_components, build_handler_chain, build_history_manager, build_teloxide_bot,
    BotComponents, Collaborators,
};
pub use config::{BotConfig, RecordStoreType, StoreConfig};
pub use handlers::{
    AuthHandler, CommandHandler, DocumentHandler, LoggingHandler, TextHandler, VoiceHandler,
};
pub use runner::{load_history, process_message, reset_history, run_bot};
pub use telegram::{run_repl, TelegramBotAdapter, TelegramMessageWrapper, TelegramUserWrapper};
pub use user_locks::UserLocks;
