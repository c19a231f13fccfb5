use crate::{
    config::Settings,
    llm::LlmClient,
    pipeline::{content::AttachmentFetcher, Pipeline},
};
use std::sync::Arc;

/// Collection of data that is shared across events
pub struct Context<'a> {
    // Bot's own context types
    pub settings: &'a Settings,
    pub llm: &'a dyn LlmClient,
    pub fetcher: &'a dyn AttachmentFetcher,
    // Discord/Serenity context types
    pub http: &'a Arc<serenity::all::Http>,
}

impl<'a> Context<'a> {
    /// Reaction pipeline wired to the live Discord connection
    pub fn pipeline(&self) -> Pipeline<'a> {
        let http: &'a serenity::all::Http = self.http;
        Pipeline {
            settings: self.settings,
            llm: self.llm,
            fetcher: self.fetcher,
            reactor: http,
        }
    }
}
