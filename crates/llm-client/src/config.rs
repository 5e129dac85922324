//! OpenAI-compatible endpoint settings loaded from the environment.

use anyhow::{Context, Result};
use std::env;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4";

#[derive(Debug, Clone)]
pub struct OpenAISettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl OpenAISettings {
    /// Reads `OPENAI_API_KEY` (required), `OPENAI_BASE_URL` and `AI_MODEL`.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY").context("OPENAI_API_KEY not set")?;
        let base_url =
            env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string());
        let model = env::var("AI_MODEL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Ok(Self {
            api_key,
            base_url,
            model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        env::set_var("OPENAI_API_KEY", "sk-test");
        env::remove_var("OPENAI_BASE_URL");
        env::remove_var("AI_MODEL");

        let settings = OpenAISettings::from_env().unwrap();
        assert_eq!(settings.api_key, "sk-test");
        assert_eq!(settings.base_url, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(settings.model, DEFAULT_MODEL);

        env::remove_var("OPENAI_API_KEY");
    }

    #[test]
    #[serial]
    fn test_from_env_requires_key() {
        env::remove_var("OPENAI_API_KEY");
        assert!(OpenAISettings::from_env().is_err());
    }
}
