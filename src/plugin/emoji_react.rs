use crate::{event::*, helper::MessageHelper, plugin::*};
use anyhow::Result;
use tracing::debug;

/// Runs every message through the reaction pipeline
pub struct PluginEmojiReact;

#[serenity::async_trait]
impl Plugin for PluginEmojiReact {
    fn name(&self) -> &'static str {
        "emoji_react"
    }

    async fn handle(&self, ctx: &Context<'_>, event: &Event) -> Result<EventHandled> {
        let Event::Message(msg) = event else {
            return Ok(EventHandled::No);
        };

        let incoming = msg.to_incoming();
        let outcome = ctx.pipeline().run(&incoming).await;
        debug!(message = %incoming.id, ?outcome, "message handled");

        Ok(EventHandled::Yes)
    }
}
