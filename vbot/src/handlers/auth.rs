use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;
use vbot_core::{Bot, Handler, Message, Result};

use super::replies::UNAUTHORIZED;

/// Vetoes messages from users outside the allowlist after telling them why.
pub struct AuthHandler {
    bot: Arc<dyn Bot>,
    allowed: HashSet<i64>,
}

impl AuthHandler {
    pub fn new(bot: Arc<dyn Bot>, allowed: impl IntoIterator<Item = i64>) -> Self {
        Self {
            bot,
            allowed: allowed.into_iter().collect(),
        }
    }

    pub fn is_allowed(&self, user_id: i64) -> bool {
        self.allowed.contains(&user_id)
    }
}

#[async_trait]
impl Handler for AuthHandler {
    fn name(&self) -> &'static str {
        "auth"
    }

    async fn before(&self, message: &Message) -> Result<bool> {
        if self.is_allowed(message.user.id) {
            return Ok(true);
        }
        warn!(user_id = message.user.id, from = %message.user.display_name(), "user not in allowlist");
        self.bot.reply_to(message, UNAUTHORIZED).await?;
        Ok(false)
    }
}
