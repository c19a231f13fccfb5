use crate::{event::*, helper::truncate, plugin::*};
use anyhow::Result;
use tracing::debug;

/// Logs every event at debug level
pub struct PluginDebug;

#[serenity::async_trait]
impl Plugin for PluginDebug {
    fn name(&self) -> &'static str {
        "debug"
    }

    async fn handle(&self, _ctx: &Context<'_>, event: &Event) -> Result<EventHandled> {
        match event {
            Event::Ready(ready) => {
                debug!(
                    "Connected to {} server(s) as {}",
                    ready.guilds.len(),
                    ready.user.name
                );
            }
            Event::Message(msg) => {
                debug!(
                    guild = ?msg.guild_id.map(|id| id.get()),
                    channel = %msg.channel_id,
                    message = %msg.id,
                    author = %msg.author.name,
                    bot = msg.author.bot,
                    attachments = msg.attachments.len(),
                    "{}",
                    truncate(&msg.content, 200),
                );
            }
        }

        Ok(EventHandled::No)
    }
}
