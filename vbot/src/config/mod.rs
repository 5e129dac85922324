//! Bot configuration: BaseConfig (Telegram + log) + StoreConfig (history, profiles) +
//! ServicesConfig (speech services, ffmpeg, bundled assets) + OpenAI settings.

mod base;
mod bot_config;
mod services;
mod store;


pub use base::BaseConfig;
pub use bot_config::BotConfig;
pub use services::ServicesConfig;
pub use store::{RecordStoreType, StoreConfig};
