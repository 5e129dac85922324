//! REPL runner: converts teloxide messages to core::Message and passes them to the HandlerChain,
//! one spawned task per message, serialized per user.

use anyhow::Result;
use teloxide::prelude::*;
use tracing::{info, instrument};
use vbot_core::ToCoreMessage;

use super::adapters::TelegramMessageWrapper;
use crate::chain::HandlerChain;
use crate::runner::process_message;
use crate::user_locks::UserLocks;

/// Starts the REPL with the given teloxide Bot and HandlerChain. Each message is converted to
/// core::Message and handled in its own task; `locks` keeps one user's messages in order.
#[instrument(skip(bot, handler_chain, locks))]
pub async fn run_repl(bot: teloxide::Bot, handler_chain: HandlerChain, locks: UserLocks) -> Result<()> {
    if let Ok(me) = bot.get_me().await {
        info!(username = ?me.user.username, "Bot identity resolved");
    }

    teloxide::repl(bot, move |_bot: Bot, msg: teloxide::types::Message| {
        let chain = handler_chain.clone();
        let locks = locks.clone();

        async move {
            let core_msg = TelegramMessageWrapper(&msg).to_core();
            info!(
                user_id = core_msg.user.id,
                chat_id = core_msg.chat.id,
                message_type = %core_msg.message_type,
                "Received message"
            );

            // REPL returns immediately; the user lock orders same-user work inside the task.
            tokio::spawn(async move {
                let _ = process_message(&chain, &locks, &core_msg).await;
            });

            Ok(())
        }
    })
    .await;

    Ok(())
}
