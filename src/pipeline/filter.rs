//! Decides whether a message is worth reacting to at all.  No network access.

use crate::{config::Settings, pipeline::IncomingMessage};
use regex::Regex;
use std::sync::LazyLock;

/// Content left over after removing URLs that still counts as "just a link"
const BARE_LINK_SLACK: usize = 3;

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://\S+|www\.\S+").expect("static url pattern is valid")
});

/// One or more user, role or channel mentions and whitespace, nothing else
static MENTIONS_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:<(?:@[!&]?|#)\d+>\s*)+$").expect("static mention pattern is valid")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterDecision {
    Accept,
    Reject(RejectReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    NotWhitelisted,
    BotAuthor,
    BareLink,
    Empty,
    MentionOnly,
    SystemMessage,
}

impl RejectReason {
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::NotWhitelisted => "not_whitelisted",
            RejectReason::BotAuthor => "bot_author",
            RejectReason::BareLink => "bare_link",
            RejectReason::Empty => "empty",
            RejectReason::MentionOnly => "mention_only",
            RejectReason::SystemMessage => "system_message",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// First matching rule wins.
pub fn filter(msg: &IncomingMessage, settings: &Settings) -> FilterDecision {
    use RejectReason::*;

    let content = msg.content.trim();

    let reason = if !settings.is_whitelisted(msg.channel_id) {
        NotWhitelisted
    } else if settings.ignore_bots && msg.author_is_bot {
        BotAuthor
    } else if settings.ignore_links_only && is_bare_link(content) {
        BareLink
    } else if content.is_empty() && !msg.has_attachments() && !msg.has_embeds {
        Empty
    } else if is_mention_only(content) {
        MentionOnly
    } else if msg.is_system {
        SystemMessage
    } else {
        return FilterDecision::Accept;
    };

    FilterDecision::Reject(reason)
}

/// One or more URLs and next to nothing else.
fn is_bare_link(content: &str) -> bool {
    if !URL.is_match(content) {
        return false;
    }
    let rest = URL.replace_all(content, "");
    rest.trim().chars().count() < BARE_LINK_SLACK
}

/// Only `<@123>`, `<@!123>`, `<@&123>` or `<#123>` mentions.
fn is_mention_only(content: &str) -> bool {
    MENTIONS_ONLY.is_match(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::test_settings, pipeline::testing::message};
    use serenity::all::ChannelId;

    fn decide(msg: &IncomingMessage) -> FilterDecision {
        filter(msg, &test_settings(""))
    }

    #[test]
    fn non_whitelisted_channel_is_rejected_regardless_of_content() {
        for content in ["hello", "", "https://example.com", "<@42>"] {
            let mut msg = message(content);
            msg.channel_id = ChannelId::new(999);
            msg.author_is_bot = true;
            assert_eq!(
                decide(&msg),
                FilterDecision::Reject(RejectReason::NotWhitelisted)
            );
        }
    }

    #[test]
    fn bot_authors_follow_ignore_bots() {
        let mut msg = message("beep boop");
        msg.author_is_bot = true;
        assert_eq!(decide(&msg), FilterDecision::Reject(RejectReason::BotAuthor));

        let settings = test_settings("ignore_bots = false\n");
        assert_eq!(filter(&msg, &settings), FilterDecision::Accept);
    }

    #[test]
    fn bare_links_are_rejected() {
        for content in [
            "https://example.com/cat.gif",
            "   https://example.com   ",
            "www.example.com",
            "https://a.example https://b.example",
            "https://example.com ok",
        ] {
            assert_eq!(
                decide(&message(content)),
                FilterDecision::Reject(RejectReason::BareLink),
                "{content}"
            );
        }
    }

    #[test]
    fn links_with_prose_are_accepted() {
        let msg = message("https://example.com look at this amazing view");
        assert_eq!(decide(&msg), FilterDecision::Accept);
    }

    #[test]
    fn bare_links_pass_when_not_ignored() {
        let settings = test_settings("ignore_links_only = false\n");
        assert_eq!(
            filter(&message("https://example.com"), &settings),
            FilterDecision::Accept
        );
    }

    #[test]
    fn empty_messages_need_attachments_or_embeds() {
        assert_eq!(
            decide(&message("   ")),
            FilterDecision::Reject(RejectReason::Empty)
        );

        let mut with_file = message("");
        with_file.other_attachments = 1;
        assert_eq!(decide(&with_file), FilterDecision::Accept);

        let mut with_embed = message("");
        with_embed.has_embeds = true;
        assert_eq!(decide(&with_embed), FilterDecision::Accept);
    }

    #[test]
    fn mention_only_messages_are_rejected() {
        for content in ["<@123>", "<@!123>", "<@&123>", "<#123>", "<@1> <#2>"] {
            assert_eq!(
                decide(&message(content)),
                FilterDecision::Reject(RejectReason::MentionOnly),
                "{content}"
            );
        }
        for content in ["<@123> nice one", "1234", "<3", "<333", "<@>", "<@123"] {
            assert_eq!(decide(&message(content)), FilterDecision::Accept, "{content}");
        }
    }

    #[test]
    fn system_messages_are_rejected() {
        let mut msg = message("pinned a message");
        msg.is_system = true;
        assert_eq!(
            decide(&msg),
            FilterDecision::Reject(RejectReason::SystemMessage)
        );
    }

    #[test]
    fn reason_codes_are_stable() {
        assert_eq!(RejectReason::NotWhitelisted.to_string(), "not_whitelisted");
        assert_eq!(RejectReason::BotAuthor.to_string(), "bot_author");
        assert_eq!(RejectReason::BareLink.to_string(), "bare_link");
        assert_eq!(RejectReason::Empty.to_string(), "empty");
    }
}
