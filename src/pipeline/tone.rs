//! Optional guard that skips messages where any reaction would be out of place.
//!
//! Failures here never block a reaction: an unreachable or confused classifier answers
//! [`ToneVerdict::Appropriate`].

use crate::{
    config::Settings,
    llm::{LlmClient, LlmSettings, UserContent},
    pipeline::{content, IncomingMessage},
};
use tracing::{debug, warn};

pub(crate) const TONE_SYSTEM_PROMPT: &str = "You decide whether a Discord bot should add a light-hearted \
emoji reaction to a message. React to almost everything: jokes, news, questions, complaints, \
memes, photos, small talk. Only skip messages that clearly describe an emergency, genuine \
distress, an active conflict between people, or a tragedy such as a death. \
Answer with exactly one word: REACT or SKIP.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToneVerdict {
    Appropriate,
    Skip,
}

pub async fn classify(
    msg: &IncomingMessage,
    prepared: &UserContent,
    settings: &Settings,
    llm: &dyn LlmClient,
) -> ToneVerdict {
    let llm_settings = LlmSettings {
        model_name: &settings.tone_model,
        system: TONE_SYSTEM_PROMPT,
        max_tokens: 5,
        temperature: 0.0,
    };

    let response = if settings.tone_supports_vision {
        llm.complete(&llm_settings, prepared).await
    } else {
        llm.complete(&llm_settings, &content::text_only(prepared))
            .await
    };

    match response {
        Ok(text) => {
            let verdict = parse_verdict(&text);
            debug!(message = %msg.id, response = %text, ?verdict, "tone classified");
            verdict
        }
        Err(err) => {
            warn!(
                channel = %msg.channel_id,
                message = %msg.id,
                "Tone check failed, reacting anyway: {:#}",
                err
            );
            ToneVerdict::Appropriate
        }
    }
}

/// Only an explicit SKIP skips.
pub fn parse_verdict(response: &str) -> ToneVerdict {
    let first_word = response
        .split_whitespace()
        .next()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()));

    match first_word {
        Some(word) if word.eq_ignore_ascii_case("skip") => ToneVerdict::Skip,
        _ => ToneVerdict::Appropriate,
    }
}
