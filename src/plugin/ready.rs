use crate::{config::Settings, event::*, plugin::*};
use anyhow::Result;
use serenity::all::Permissions;
use tracing::{info, warn};

/// Reports the connection and the bot's setup when Discord is ready.
pub struct PluginReady;

#[serenity::async_trait]
impl Plugin for PluginReady {
    fn name(&self) -> &'static str {
        "ready"
    }

    async fn handle(&self, ctx: &Context<'_>, event: &Event) -> Result<EventHandled> {
        let Event::Ready(ready) = event else {
            return Ok(EventHandled::No);
        };

        let settings = ctx.settings;
        info!("Emoji React Bot logged in as {}", ready.user.name);
        info!("Bot ID: {}", ready.user.id);
        info!(
            "Vision support: {} (model: {})",
            if settings.supports_vision {
                "enabled"
            } else {
                "disabled"
            },
            settings.model
        );
        if settings.check_tone_appropriateness {
            info!("Tone check enabled (model: {})", settings.tone_model);
        }
        if settings.whitelisted_channels.is_empty() {
            warn!("No whitelisted channels configured - bot won't react to any messages");
        } else {
            info!(
                "Reacting in {} whitelisted channel(s)",
                settings.whitelisted_channels.len()
            );
        }
        if let Some(url) = invite_url(settings) {
            info!("Invite URL: {}", url);
        }

        Ok(EventHandled::Yes)
    }
}

/// OAuth2 URL granting just what reacting needs
fn invite_url(settings: &Settings) -> Option<String> {
    let permissions =
        Permissions::VIEW_CHANNEL | Permissions::ADD_REACTIONS | Permissions::READ_MESSAGE_HISTORY;

    settings.client_id.map(|client_id| {
        format!(
            "https://discord.com/oauth2/authorize?client_id={}&permissions={}&scope=bot",
            client_id,
            permissions.bits()
        )
    })
}
