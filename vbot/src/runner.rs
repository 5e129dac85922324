//! Entry points: run the bot, process one message, and the offline history commands.

use anyhow::Result;
use tracing::{error, info, instrument};
use vbot_core::{init_tracing, HandlerResponse, Message};

use crate::chain::HandlerChain;
use crate::components::{
    build_bot_components, build_handler_chain, build_history_manager, build_teloxide_bot,
    Collaborators,
};
use crate::config::{BotConfig, StoreConfig};
use crate::telegram::run_repl;
use crate::user_locks::UserLocks;

/// Main entry: validate config, init logging, build components and the chain, then run the REPL.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(config.log_file())?;

    info!(
        data_dir = %config.store.data_dir.display(),
        record_store_type = %config.store.record_store_type,
        api_key = %openai_client::mask_token(&config.openai.api_key),
        "Initializing bot"
    );

    let teloxide_bot = build_teloxide_bot(&config.base);
    let collaborators = Collaborators::from_config(&config, teloxide_bot.clone());
    let components = build_bot_components(&config, collaborators).await?;
    let chain = build_handler_chain(&config, &components)?;

    info!(handlers = chain.len(), "Bot started successfully");

    run_repl(teloxide_bot, chain, UserLocks::new()).await
}

/// Runs `message` through `chain` while holding its user's lock. Chain errors are logged.
pub async fn process_message(
    chain: &HandlerChain,
    locks: &UserLocks,
    message: &Message,
) -> Option<HandlerResponse> {
    let _guard = locks.acquire(message.user.id).await;
    info!(
        user_id = message.user.id,
        chat_id = message.chat.id,
        message_id = %message.id,
        "step: processing message (handler chain started)"
    );
    match chain.handle(message).await {
        Ok(response) => Some(response),
        Err(e) => {
            error!(error = %e, user_id = message.user.id, "Handler chain failed");
            None
        }
    }
}

/// Reconstructed history of a user as `(role, text)` lines, profile seed first.
pub async fn load_history(store: &StoreConfig, user_id: &str) -> Result<Vec<(String, String)>> {
    let history = build_history_manager(store).await?;
    Ok(history
        .reconstruct(user_id)
        .await?
        .into_iter()
        .map(|line| (line.role, line.text))
        .collect())
}

/// Deletes a user's turns; the profile is kept. Returns the number removed.
pub async fn reset_history(store: &StoreConfig, user_id: &str) -> Result<usize> {
    let history = build_history_manager(store).await?;
    Ok(history.clear(user_id).await?)
}
