//! vbot binary: `run` starts the bot; `history` and `reset` work on the stored data offline.

use anyhow::Result;
use clap::Parser;
use vbot::{
    load_config, load_history, load_store_config, render_history, reset_history, run_bot, Cli,
    Commands,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = load_config(token)?;
            run_bot(config).await
        }
        Commands::History { user, json } => {
            let store = load_store_config()?;
            let lines = load_history(&store, &user).await?;
            if lines.is_empty() && !json {
                println!("No history for user {user}");
            } else {
                println!("{}", render_history(&lines, json)?);
            }
            Ok(())
        }
        Commands::Reset { user } => {
            let store = load_store_config()?;
            let removed = reset_history(&store, &user).await?;
            println!("Removed {removed} stored turns for user {user}");
            Ok(())
        }
    }
}
