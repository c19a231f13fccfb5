use crate::{
    config::Settings,
    llm::{LlmClient, LlmSettings, UserContent},
    pipeline::content,
};
use anyhow::Result;

/// One emoji rarely needs more, and the cap keeps chatty models cheap.
const MAX_TOKENS: u32 = 10;
const TEMPERATURE: f32 = 0.7;

/// Asks the main model for a reaction.  Returns the raw reply, which still has to go through
/// [`extract_emoji`](crate::pipeline::extract::extract_emoji).
///
/// Each call is billed; call once per message.
pub async fn generate(
    prepared: &UserContent,
    settings: &Settings,
    llm: &dyn LlmClient,
) -> Result<String> {
    let llm_settings = LlmSettings {
        model_name: &settings.model,
        system: &settings.system_prompt,
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
    };
    if settings.supports_vision {
        llm.complete(&llm_settings, prepared).await
    } else {
        llm.complete(&llm_settings, &content::text_only(prepared))
            .await
    }
}
