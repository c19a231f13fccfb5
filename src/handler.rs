use crate::{
    config::Settings, context::Context, event::Event, llm::LlmClient,
    pipeline::content::AttachmentFetcher,
};
use serenity::all::{Message, Ready};

/// Discord event handler
///
/// Everything here is read-only once the client starts, so events never wait on each other.
pub struct Handler {
    settings: Settings,
    llm: Box<dyn LlmClient>,
    fetcher: Box<dyn AttachmentFetcher>,
}

impl<'a> Handler {
    pub fn new(
        settings: Settings,
        llm: Box<dyn LlmClient>,
        fetcher: Box<dyn AttachmentFetcher>,
    ) -> Self {
        Self {
            settings,
            llm,
            fetcher,
        }
    }

    fn ctx(&'a self, discord_ctx: &'a serenity::all::Context) -> Context<'a> {
        Context {
            settings: &self.settings,
            llm: self.llm.as_ref(),
            fetcher: self.fetcher.as_ref(),
            http: &discord_ctx.http,
        }
    }
}

#[serenity::async_trait]
impl serenity::all::EventHandler for Handler {
    async fn ready(&self, discord_ctx: serenity::all::Context, ready: Ready) {
        Event::Ready(ready).handle(self.ctx(&discord_ctx)).await;
    }

    async fn message(&self, discord_ctx: serenity::all::Context, msg: Message) {
        Event::Message(msg).handle(self.ctx(&discord_ctx)).await;
    }
}
