//! Miscellaneous convenience methods

use crate::pipeline::{ImageAttachment, IncomingMessage};
use serenity::all::MessageType;
use std::borrow::Cow;

pub trait MessageHelper {
    /// Copy out what the reaction pipeline needs
    fn to_incoming(&self) -> IncomingMessage;
    fn is_system_message(&self) -> bool;
}

impl MessageHelper for serenity::all::Message {
    fn to_incoming(&self) -> IncomingMessage {
        let (images, others): (Vec<_>, Vec<_>) = self.attachments.iter().partition(|att| {
            att.content_type
                .as_deref()
                .is_some_and(|content_type| content_type.starts_with("image"))
        });

        let images = images
            .into_iter()
            .map(|att| ImageAttachment {
                url: att.url.clone(),
                filename: att.filename.clone(),
                content_type: att.content_type.clone().unwrap_or_default(),
            })
            .collect();

        IncomingMessage {
            id: self.id,
            channel_id: self.channel_id,
            author_name: self.author.name.clone(),
            author_is_bot: self.author.bot,
            content: self.content.clone(),
            images,
            other_attachments: others.len(),
            has_embeds: !self.embeds.is_empty(),
            is_system: self.is_system_message(),
        }
    }

    fn is_system_message(&self) -> bool {
        !matches!(self.kind, MessageType::Regular | MessageType::InlineReply)
    }
}

/// At most `max` characters of `text`, with an ellipsis when cut.
pub fn truncate(text: &str, max: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}
