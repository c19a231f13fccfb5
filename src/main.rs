mod config;
mod context;
mod event;
mod handler;
mod helper;
mod llm;
mod logging;
mod pipeline;
mod plugin;

use anyhow::Context as _;
use serenity::{all::GatewayIntents, Client};
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Config path may be given as the only argument
    let path = match std::env::args().nth(1) {
        Some(path) => PathBuf::from(path),
        None => crate::config::Config::default_path()?,
    };
    let settings = crate::config::Settings::load(&path).await?;
    crate::logging::init(settings.log_level);
    info!("Loaded configuration from {}", path.display());

    let llm = crate::llm::OpenAiClient::new(&settings)?;
    let fetcher = reqwest::Client::builder()
        .timeout(settings.request_timeout)
        .build()
        .context("Could not build attachment http client")?;
    let token = settings.bot_token.clone();
    let handler = handler::Handler::new(settings, Box::new(llm), Box::new(fetcher));

    // Things we want discord to tell us about.
    let intents =
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT;

    Client::builder(&token, intents)
        .event_handler(handler)
        .await?
        .start()
        .await
        .map_err(Into::into)
}
