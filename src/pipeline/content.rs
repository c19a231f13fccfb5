//! Builds the user turn sent to the language model from a Discord message.

use crate::{
    helper::truncate,
    llm::{ContentPart, ImageUrl, UserContent},
    pipeline::IncomingMessage,
};
use anyhow::{bail, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::{debug, info, warn};

/// Images beyond this are dropped to keep token usage down
const MAX_IMAGES: usize = 3;

/// Downloads attachment bytes
#[serenity::async_trait]
pub trait AttachmentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

#[serenity::async_trait]
impl AttachmentFetcher for reqwest::Client {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            bail!("Attachment download returned {}", status);
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Text plus, when `with_images`, up to three inlined image attachments.
pub async fn prepare(
    msg: &IncomingMessage,
    with_images: bool,
    fetcher: &dyn AttachmentFetcher,
) -> UserContent {
    let mut parts = Vec::new();

    let text = msg.content.trim();
    if !text.is_empty() {
        parts.push(ContentPart::Text {
            text: text.to_owned(),
        });
    }

    if with_images && !msg.images.is_empty() {
        info!(
            message = %msg.id,
            "Processing {} image(s)",
            msg.images.len().min(MAX_IMAGES)
        );

        for image in msg.images.iter().take(MAX_IMAGES) {
            match fetcher.fetch(&image.url).await {
                Ok(bytes) => {
                    let url = format!(
                        "data:{};base64,{}",
                        image.content_type,
                        STANDARD.encode(bytes)
                    );
                    parts.push(ContentPart::ImageUrl {
                        image_url: ImageUrl { url },
                    });
                    debug!(filename = %image.filename, "added image");
                }
                Err(err) => warn!(
                    message = %msg.id,
                    "Failed to process image {}: {}",
                    truncate(&image.filename, 64),
                    err
                ),
            }
        }
    }

    if parts.is_empty() {
        let placeholder = if msg.has_embeds {
            "[embed content]"
        } else {
            "[message]"
        };
        return UserContent::Text(placeholder.to_owned());
    }
    if let [ContentPart::Text { text }] = parts.as_mut_slice() {
        return UserContent::Text(std::mem::take(text));
    }
    UserContent::Parts(parts)
}

/// Same content without images, for models that only read text.
pub fn text_only(content: &UserContent) -> UserContent {
    match content {
        UserContent::Text(_) => content.clone(),
        UserContent::Parts(parts) => {
            let text: Vec<&str> = parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::ImageUrl { .. } => None,
                })
                .collect();
            if text.is_empty() {
                UserContent::Text("[image]".to_owned())
            } else {
                UserContent::Text(text.join("\n"))
            }
        }
    }
}
