//! Decides whether and how to react to a single message.
//!
//! filter → content → tone (optional) → generate → extract → dispatch
//!
//! Every stage short-circuits.  Nothing here returns an error: failures are logged where they
//! happen and surface as an [`Outcome`], so one bad message can't affect the next.

pub mod content;
pub mod dispatch;
pub mod extract;
pub mod filter;
pub mod generate;
pub mod tone;

#[cfg(test)]
pub(crate) mod testing;

use crate::{config::Settings, helper::truncate, llm::LlmClient};
use content::AttachmentFetcher;
use dispatch::{ReactFailure, Reactor};
use extract::EmojiToken;
use filter::{FilterDecision, RejectReason};
use serenity::all::{ChannelId, MessageId};
use tone::ToneVerdict;
use tracing::{debug, error, info, warn};

/// Characters of message content included in log lines
const LOG_CONTENT_CHARS: usize = 100;

/// The parts of a Discord message the pipeline looks at
#[derive(Clone, Debug)]
pub struct IncomingMessage {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub author_name: String,
    pub author_is_bot: bool,
    pub content: String,
    pub images: Vec<ImageAttachment>,
    /// Attachments that aren't images, e.g. documents or audio
    pub other_attachments: usize,
    pub has_embeds: bool,
    /// Join notices, pins, boosts and other non-user messages
    pub is_system: bool,
}

#[derive(Clone, Debug)]
pub struct ImageAttachment {
    pub url: String,
    pub filename: String,
    pub content_type: String,
}

impl IncomingMessage {
    pub fn has_attachments(&self) -> bool {
        !self.images.is_empty() || self.other_attachments > 0
    }
}

/// How processing of one message ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Rejected(RejectReason),
    SkippedByTone,
    GenerationFailed,
    NoEmoji,
    ReactFailed(ReactFailure),
    Reacted(EmojiToken),
}

/// The pipeline's collaborators.  Borrowed per message; nothing is mutated.
pub struct Pipeline<'a> {
    pub settings: &'a Settings,
    pub llm: &'a dyn LlmClient,
    pub fetcher: &'a dyn AttachmentFetcher,
    pub reactor: &'a dyn Reactor,
}

impl Pipeline<'_> {
    pub async fn run(&self, msg: &IncomingMessage) -> Outcome {
        if let FilterDecision::Reject(reason) = filter::filter(msg, self.settings) {
            debug!(
                channel = %msg.channel_id,
                message = %msg.id,
                %reason,
                "Ignoring message from {}: {}",
                msg.author_name,
                truncate(&msg.content, 50)
            );
            return Outcome::Rejected(reason);
        }

        info!(
            channel = %msg.channel_id,
            message = %msg.id,
            "Processing message from {}: {}",
            msg.author_name,
            truncate(&msg.content, LOG_CONTENT_CHARS)
        );

        let prepared = content::prepare(msg, self.settings.wants_images(), self.fetcher).await;

        if self.settings.check_tone_appropriateness
            && tone::classify(msg, &prepared, self.settings, self.llm).await == ToneVerdict::Skip
        {
            info!(channel = %msg.channel_id, message = %msg.id, "Skipping reaction due to tone");
            return Outcome::SkippedByTone;
        }

        let response = match generate::generate(&prepared, self.settings, self.llm).await {
            Ok(response) => response,
            Err(err) => {
                error!(
                    channel = %msg.channel_id,
                    message = %msg.id,
                    content = %truncate(&msg.content, LOG_CONTENT_CHARS),
                    "Error getting emoji from LLM: {:#}",
                    err
                );
                return Outcome::GenerationFailed;
            }
        };
        debug!(message = %msg.id, %response, "LLM response");

        let Some(emoji) = extract::extract_emoji(&response) else {
            warn!(
                channel = %msg.channel_id,
                message = %msg.id,
                content = %truncate(&msg.content, LOG_CONTENT_CHARS),
                "No valid emoji in LLM response: {}",
                truncate(&response, LOG_CONTENT_CHARS)
            );
            return Outcome::NoEmoji;
        };

        match dispatch::dispatch(msg, &emoji, self.reactor).await {
            Ok(()) => Outcome::Reacted(emoji),
            Err(failure) => Outcome::ReactFailed(failure),
        }
    }
}
