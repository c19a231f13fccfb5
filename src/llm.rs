use crate::config::Settings;
use anyhow::{anyhow, bail, Context, Result};
use tracing::debug;

/// LLM generation settings for a single call
pub struct LlmSettings<'a> {
    pub model_name: &'a str,
    pub system: &'a str,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Something that can answer a single system + user prompt.
///
/// Stages only see this trait so they can be exercised without a network.
#[serenity::async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, settings: &LlmSettings<'_>, content: &UserContent) -> Result<String>;
}

/// User turn content.  Plain text unless images are attached.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum UserContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(serde::Serialize)]
pub struct LlmChatRequest<'a> {
    /// LLM model name
    model: &'a str,
    /// System prompt followed by the user's message
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(serde::Serialize)]
#[serde(tag = "role", content = "content", rename_all = "lowercase")]
enum ChatMessage<'a> {
    System(&'a str),
    User(&'a UserContent),
}

#[derive(serde::Deserialize)]
struct LlmChatResponse {
    choices: Vec<Choice>,
}

#[derive(serde::Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(serde::Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl<'a> LlmChatRequest<'a> {
    pub fn new(settings: &LlmSettings<'a>, content: &'a UserContent) -> Self {
        Self {
            model: settings.model_name,
            messages: [
                ChatMessage::System(settings.system),
                ChatMessage::User(content),
            ],
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        }
    }
}

/// OpenAI-compatible chat completions endpoint
pub struct OpenAiClient {
    client: reqwest::Client,
    chat_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .context("Could not build LLM http client")?;

        Ok(Self {
            client,
            chat_url: format!("{}/chat/completions", settings.openai_base_url),
            api_key: settings.openai_api_key.clone(),
        })
    }
}

#[serenity::async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, settings: &LlmSettings<'_>, content: &UserContent) -> Result<String> {
        let request = LlmChatRequest::new(settings, content);

        debug!(url = %self.chat_url, model = settings.model_name, "sending chat request");
        let response = self
            .client
            .post(&self.chat_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send chat request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Chat endpoint returned {}: {}", status, body);
        }

        let response = response
            .json::<LlmChatResponse>()
            .await
            .context("Failed to parse chat response")?;

        response_text(response)
    }
}

fn response_text(response: LlmChatResponse) -> Result<String> {
    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or(anyhow!("Chat response contained no choices"))?
        .message
        .content
        .unwrap_or_default();

    let content = content.trim();
    if content.is_empty() {
        bail!("Chat response was empty");
    }
    Ok(content.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings() -> LlmSettings<'static> {
        LlmSettings {
            model_name: "gpt-4o-mini",
            system: "one emoji please",
            max_tokens: 10,
            temperature: 0.5,
        }
    }

    #[test]
    fn text_request_serializes_content_as_string() {
        let content = UserContent::Text("hello".to_owned());
        let request = LlmChatRequest::new(&settings(), &content);

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": "one emoji please"},
                    {"role": "user", "content": "hello"},
                ],
                "max_tokens": 10,
                "temperature": 0.5,
            })
        );
    }

    #[test]
    fn multimodal_request_serializes_parts() {
        let content = UserContent::Parts(vec![
            ContentPart::Text {
                text: "look".to_owned(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: "data:image/png;base64,AAAA".to_owned(),
                },
            },
        ]);
        let request = LlmChatRequest::new(&settings(), &content);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value["messages"][1]["content"],
            json!([
                {"type": "text", "text": "look"},
                {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA"}},
            ])
        );
    }

    #[test]
    fn response_text_takes_first_choice() {
        let response: LlmChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": " 🎉\n"}}]
        }))
        .unwrap();
        assert_eq!(response_text(response).unwrap(), "🎉");
    }

    #[test]
    fn empty_or_missing_content_is_an_error() {
        let no_choices: LlmChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(response_text(no_choices).is_err());

        let null_content: LlmChatResponse =
            serde_json::from_value(json!({"choices": [{"message": {"content": null}}]})).unwrap();
        assert!(response_text(null_content).is_err());
    }
}
