//! Offline stand-ins for the pipeline's network collaborators

use crate::{
    llm::{LlmClient, LlmSettings, UserContent},
    pipeline::{
        content::AttachmentFetcher, dispatch::Reactor, tone::TONE_SYSTEM_PROMPT, ImageAttachment,
        IncomingMessage,
    },
};
use anyhow::{anyhow, Result};
use serenity::all::{ChannelId, MessageId, ReactionType};
use std::sync::Mutex;

/// A human's message in whitelisted channel 1
pub fn message(content: &str) -> IncomingMessage {
    IncomingMessage {
        id: MessageId::new(10),
        channel_id: ChannelId::new(1),
        author_name: "alice".to_owned(),
        author_is_bot: false,
        content: content.to_owned(),
        images: Vec::new(),
        other_attachments: 0,
        has_embeds: false,
        is_system: false,
    }
}

pub fn with_images(mut msg: IncomingMessage, count: usize) -> IncomingMessage {
    msg.images = (0..count)
        .map(|i| ImageAttachment {
            url: format!("https://cdn.example.com/{i}.png"),
            filename: format!("{i}.png"),
            content_type: "image/png".to_owned(),
        })
        .collect();
    msg
}

#[derive(Clone, Debug)]
pub struct LlmCall {
    pub model: String,
    pub system: String,
    pub max_tokens: u32,
    pub content: UserContent,
}

/// Answers tone checks and emoji requests with canned replies
#[derive(Default)]
pub struct StubLlm {
    tone: Option<Result<String, ()>>,
    emoji: Option<Result<String, ()>>,
    calls: Mutex<Vec<LlmCall>>,
}

impl StubLlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tone_reply(mut self, reply: &str) -> Self {
        self.tone = Some(Ok(reply.to_owned()));
        self
    }

    pub fn fail_tone(mut self) -> Self {
        self.tone = Some(Err(()));
        self
    }

    pub fn emoji_reply(mut self, reply: &str) -> Self {
        self.emoji = Some(Ok(reply.to_owned()));
        self
    }

    pub fn fail_emoji(mut self) -> Self {
        self.emoji = Some(Err(()));
        self
    }

    pub fn calls(&self) -> Vec<LlmCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[serenity::async_trait]
impl LlmClient for StubLlm {
    async fn complete(&self, settings: &LlmSettings<'_>, content: &UserContent) -> Result<String> {
        self.calls.lock().unwrap().push(LlmCall {
            model: settings.model_name.to_owned(),
            system: settings.system.to_owned(),
            max_tokens: settings.max_tokens,
            content: content.clone(),
        });

        let reply = if settings.system == TONE_SYSTEM_PROMPT {
            &self.tone
        } else {
            &self.emoji
        };
        match reply {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(())) => Err(anyhow!("connection refused")),
            None => Err(anyhow!("no canned reply")),
        }
    }
}

pub struct StubFetcher {
    fail: bool,
    calls: Mutex<usize>,
}

impl StubFetcher {
    pub fn ok() -> Self {
        Self {
            fail: false,
            calls: Mutex::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[serenity::async_trait]
impl AttachmentFetcher for StubFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
        *self.calls.lock().unwrap() += 1;
        if self.fail {
            Err(anyhow!("404 Not Found"))
        } else {
            // PNG magic, base64 "iVBO"
            Ok(vec![0x89, 0x50, 0x4E])
        }
    }
}

/// Records every reaction attempt
pub struct StubReactor {
    fail: bool,
    reactions: Mutex<Vec<(ChannelId, MessageId, ReactionType)>>,
}

impl StubReactor {
    pub fn ok() -> Self {
        Self {
            fail: false,
            reactions: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            reactions: Mutex::new(Vec::new()),
        }
    }

    pub fn reactions(&self) -> Vec<(ChannelId, MessageId, ReactionType)> {
        self.reactions.lock().unwrap().clone()
    }
}

#[serenity::async_trait]
impl Reactor for StubReactor {
    async fn react(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        reaction: ReactionType,
    ) -> Result<()> {
        self.reactions
            .lock()
            .unwrap()
            .push((channel_id, message_id, reaction));
        if self.fail {
            Err(anyhow!("Unknown Emoji"))
        } else {
            Ok(())
        }
    }
}
