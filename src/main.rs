mod api_client;
mod bot;
mod config;
mod error;
mod verdicts;

use anyhow::Result;
use config::Config;
use teloxide::prelude::*;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load configuration; a missing variable aborts startup here.
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting homework status bot...");

    let bot = Bot::new(&config.telegram_token);

    bot::run(bot, config).await?;

    Ok(())
}
