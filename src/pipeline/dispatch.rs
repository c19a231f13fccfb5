use crate::pipeline::{extract::EmojiToken, IncomingMessage};
use anyhow::Result;
use serenity::all::{ChannelId, Http, MessageId, ReactionType};
use serenity::http::HttpError;
use tracing::{error, info};

/// Discord JSON error codes
const UNKNOWN_MESSAGE: isize = 10008;
const UNKNOWN_EMOJI: isize = 10014;

/// Adds a reaction to an existing message
#[serenity::async_trait]
pub trait Reactor: Send + Sync {
    async fn react(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        reaction: ReactionType,
    ) -> Result<()>;
}

#[serenity::async_trait]
impl Reactor for Http {
    async fn react(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        reaction: ReactionType,
    ) -> Result<()> {
        self.create_reaction(channel_id, message_id, &reaction)
            .await
            .map_err(Into::into)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReactFailure {
    /// Malformed emoji, or a custom emoji the bot can't use
    InvalidEmoji,
    MissingPermission,
    MessageDeleted,
    RateLimited,
    Other,
}

impl ReactFailure {
    pub fn from_response(status: u16, code: isize) -> Self {
        match (status, code) {
            (_, UNKNOWN_EMOJI) => ReactFailure::InvalidEmoji,
            (_, UNKNOWN_MESSAGE) => ReactFailure::MessageDeleted,
            (400, _) => ReactFailure::InvalidEmoji,
            (403, _) => ReactFailure::MissingPermission,
            (404, _) => ReactFailure::MessageDeleted,
            (429, _) => ReactFailure::RateLimited,
            _ => ReactFailure::Other,
        }
    }

    fn classify(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<serenity::Error>() {
            Some(serenity::Error::Http(http_err)) => Self::from_http(http_err),
            _ => ReactFailure::Other,
        }
    }

    fn from_http(err: &HttpError) -> Self {
        match err {
            HttpError::UnsuccessfulRequest(response) => {
                Self::from_response(response.status_code.as_u16(), response.error.code)
            }
            _ => ReactFailure::Other,
        }
    }
}

impl std::fmt::Display for ReactFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(match self {
            ReactFailure::InvalidEmoji => "emoji rejected",
            ReactFailure::MissingPermission => "missing permission",
            ReactFailure::MessageDeleted => "message or emoji not found",
            ReactFailure::RateLimited => "rate limited",
            ReactFailure::Other => "request failed",
        })
    }
}

/// Applies `emoji` to `msg` once.  Failures are logged and reported, never retried.
pub async fn dispatch(
    msg: &IncomingMessage,
    emoji: &EmojiToken,
    reactor: &dyn Reactor,
) -> Result<(), ReactFailure> {
    match reactor
        .react(msg.channel_id, msg.id, emoji.clone().into())
        .await
    {
        Ok(()) => {
            info!(
                channel = %msg.channel_id,
                message = %msg.id,
                "Added reaction {} to message from {}",
                emoji,
                msg.author_name
            );
            Ok(())
        }
        Err(err) => {
            let failure = ReactFailure::classify(&err);
            error!(
                channel = %msg.channel_id,
                message = %msg.id,
                "Failed to add reaction {} ({}): {:#}",
                emoji,
                failure,
                err
            );
            Err(failure)
        }
    }
}
