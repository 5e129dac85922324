use anyhow::{Context, Result};
use llm_client::OpenAISettings;

use super::{BaseConfig, ServicesConfig, StoreConfig};

/// Everything `vbot run` reads from the environment.
pub struct BotConfig {
    pub base: BaseConfig,
    pub openai: OpenAISettings,
    pub store: StoreConfig,
    pub services: ServicesConfig,
}

impl BotConfig {
    /// Loads every section; `token` overrides BOT_TOKEN. Loading only checks presence,
    /// [`BotConfig::validate`] checks values.
    pub fn load(token: Option<String>) -> Result<Self> {
        Ok(Self {
            base: BaseConfig::load(token)?,
            openai: OpenAISettings::from_env()?,
            store: StoreConfig::from_env()?,
            services: ServicesConfig::from_env()?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        reqwest::Url::parse(&self.openai.base_url)
            .with_context(|| format!("OPENAI_BASE_URL is not a valid URL: {}", self.openai.base_url))?;
        self.services.validate()
    }

    pub fn bot_token(&self) -> &str {
        &self.base.bot_token
    }

    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }

    pub fn telegram_api_url(&self) -> Option<&str> {
        self.base.telegram_api_url.as_deref()
    }
}
