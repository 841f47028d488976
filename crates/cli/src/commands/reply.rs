//! `threadgpt reply` — Answer a Discord thread from its history.

use std::sync::Arc;
use threadgpt_channels::DiscordThread;
use threadgpt_relay::Relay;
use tracing::info;

use super::load_config;

pub async fn run(thread_id: String, summarize: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(summarize)?;
    let thread = DiscordThread::from_config(&config.discord, thread_id)?;

    let history = thread.fetch_history(config.discord.history_limit).await?;
    if history.is_empty() {
        info!("Thread has no text messages, nothing to answer");
        return Ok(());
    }

    let provider = Arc::new(threadgpt_providers::build_from_config(&config));
    Relay::from_config(&config, provider)
        .respond(&thread, &history)
        .await?;
    Ok(())
}
