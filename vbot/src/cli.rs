//! Command line: `run` starts the bot, `history` and `reset` inspect stored turns offline.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::{BotConfig, StoreConfig};

#[derive(Parser)]
#[command(name = "vbot", version, about = "Voice assistant Telegram bot")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start polling Telegram.
    Run {
        /// Overrides BOT_TOKEN.
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Show the history a user's next question would be sent with.
    History {
        #[arg(short, long)]
        user: String,
        /// Print a JSON array of `[role, text]` pairs instead of plain lines.
        #[arg(long)]
        json: bool,
    },
    /// Delete a user's stored turns. The personalization profile stays.
    Reset {
        #[arg(short, long)]
        user: String,
    },
}

pub fn load_config(token: Option<String>) -> Result<BotConfig> {
    BotConfig::load(token)
}

/// The offline commands need only the storage settings, not BOT_TOKEN or the API key.
pub fn load_store_config() -> Result<StoreConfig> {
    StoreConfig::from_env()
}

/// Formats reconstructed history for the terminal.
pub fn render_history(lines: &[(String, String)], json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(lines)?);
    }
    Ok(lines
        .iter()
        .map(|(role, text)| format!("{role}: {text}"))
        .collect::<Vec<_>>()
        .join("\n"))
}
