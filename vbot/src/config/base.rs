//! Telegram connection and log destination.

use anyhow::{bail, Context, Result};
use reqwest::Url;
use std::env;

pub const DEFAULT_LOG_FILE: &str = "logs/vbot.log";

/// Environment names accepted for a custom Bot API server, in priority order.
const API_URL_VARS: [&str; 2] = ["TELEGRAM_API_URL", "TELOXIDE_API_URL"];

#[derive(Debug, Clone)]
pub struct BaseConfig {
    pub bot_token: String,
    /// Custom Bot API server; `None` talks to api.telegram.org.
    pub telegram_api_url: Option<String>,
    pub log_file: String,
}

fn first_set(names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| env::var(name).ok())
        .filter(|v| !v.trim().is_empty())
}

impl BaseConfig {
    /// Reads `BOT_TOKEN`, `LOG_FILE` and the API URL variables. A `token` passed on
    /// the command line wins over `BOT_TOKEN`.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("BOT_TOKEN").context("BOT_TOKEN not set")?,
        };
        Ok(Self {
            bot_token,
            telegram_api_url: first_set(&API_URL_VARS),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string()),
        })
    }

    /// Parsed API server URL, if one is configured.
    pub fn api_url(&self) -> Result<Option<Url>> {
        self.telegram_api_url
            .as_deref()
            .map(|raw| {
                Url::parse(raw).with_context(|| format!("{} is not a valid URL: {raw}", API_URL_VARS[0]))
            })
            .transpose()
    }

    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            bail!("BOT_TOKEN is empty");
        }
        self.api_url()?;
        Ok(())
    }
}
