//! Reduces free-form model output to exactly one emoji.
//!
//! This errs toward accepting anything shaped like an emoji.  Discord has the final say when the
//! reaction is applied, so there is no attempt to mirror the full Unicode emoji registry here.

use regex::Regex;
use serenity::all::{EmojiId, ReactionType};
use std::sync::LazyLock;

static CUSTOM_EMOJI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<(a?):(\w+):(\d+)>").expect("static custom emoji pattern is valid")
});

const ZWJ: char = '\u{200D}';
const VS15: char = '\u{FE0E}';
const VS16: char = '\u{FE0F}';
const KEYCAP: char = '\u{20E3}';

/// A single reaction-ready emoji
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmojiToken {
    /// One Unicode emoji grapheme cluster
    Unicode(String),
    /// Guild emoji, `<:name:id>` or `<a:name:id>` when animated
    Custom { animated: bool, name: String, id: u64 },
}

impl std::fmt::Display for EmojiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            EmojiToken::Unicode(emoji) => f.write_str(emoji),
            EmojiToken::Custom { animated, name, id } => {
                write!(f, "<{}:{}:{}>", if *animated { "a" } else { "" }, name, id)
            }
        }
    }
}

impl From<EmojiToken> for ReactionType {
    fn from(token: EmojiToken) -> Self {
        match token {
            EmojiToken::Unicode(emoji) => ReactionType::Unicode(emoji),
            EmojiToken::Custom { animated, name, id } => ReactionType::Custom {
                animated,
                // Non-zero by construction in `custom_at`.
                id: EmojiId::new(id),
                name: Some(name),
            },
        }
    }
}

/// Returns the first emoji in `text`, or `None` if there is none.  Never substitutes a default.
pub fn extract_emoji(text: &str) -> Option<EmojiToken> {
    let mut offset = 0;
    while offset < text.len() {
        let rest = &text[offset..];
        if rest.starts_with('<') {
            if let Some(token) = custom_at(rest) {
                return Some(token);
            }
        }
        if let Some(len) = unicode_cluster_len(rest) {
            return Some(EmojiToken::Unicode(rest[..len].to_owned()));
        }
        // Not an emoji; step over one char.
        offset += rest.chars().next().map_or(1, char::len_utf8);
    }
    None
}

/// Custom emoji reference anchored at the start of `text`
fn custom_at(text: &str) -> Option<EmojiToken> {
    let caps = CUSTOM_EMOJI.captures(text)?;
    let id = caps[3].parse::<u64>().ok().filter(|&id| id != 0)?;
    Some(EmojiToken::Custom {
        animated: !caps[1].is_empty(),
        name: caps[2].to_owned(),
        id,
    })
}

/// Byte length of the emoji grapheme cluster starting `text`, if one does.
fn unicode_cluster_len(text: &str) -> Option<usize> {
    let mut chars = text.char_indices().peekable();
    let (_, first) = chars.next()?;
    let mut end = first.len_utf8();

    // Keycaps: 1️⃣ #⃣
    if matches!(first, '0'..='9' | '#' | '*') {
        let mut len = end;
        let mut rest = text[len..].chars();
        let mut next = rest.next();
        if next == Some(VS16) {
            len += VS16.len_utf8();
            next = rest.next();
        }
        return (next == Some(KEYCAP)).then(|| len + KEYCAP.len_utf8());
    }

    let next = chars.peek().map(|&(_, c)| c);
    if !is_emoji_base(first) && next != Some(VS16) {
        return None;
    }

    // Flags are pairs of regional indicators.
    if is_regional_indicator(first) {
        if let Some(&(i, c)) = chars.peek() {
            if is_regional_indicator(c) {
                return Some(i + c.len_utf8());
            }
        }
        return Some(end);
    }

    while let Some(&(i, c)) = chars.peek() {
        if is_modifier(c) {
            chars.next();
            end = i + c.len_utf8();
        } else if c == ZWJ {
            // Only keep the joiner if another emoji follows it.
            let mut lookahead = chars.clone();
            lookahead.next();
            match lookahead.peek() {
                Some(&(j, joined)) if is_emoji_base(joined) => {
                    chars = lookahead;
                    chars.next();
                    end = j + joined.len_utf8();
                }
                _ => break,
            }
        } else {
            break;
        }
    }

    Some(end)
}

fn is_modifier(c: char) -> bool {
    matches!(c,
        VS15 | VS16 | KEYCAP
        | '\u{1F3FB}'..='\u{1F3FF}' // skin tones
        | '\u{E0020}'..='\u{E007F}' // tag sequences, e.g. subdivision flags
    )
}

fn is_regional_indicator(c: char) -> bool {
    matches!(c, '\u{1F1E6}'..='\u{1F1FF}')
}

fn is_emoji_base(c: char) -> bool {
    matches!(c,
        '\u{1F000}'..='\u{1F02F}' // mahjong
        | '\u{1F0A0}'..='\u{1F0FF}' // playing cards
        | '\u{1F170}'..='\u{1F251}' // enclosed alphanumerics and ideographs
        | '\u{1F300}'..='\u{1F5FF}' // symbols and pictographs
        | '\u{1F600}'..='\u{1F64F}' // emoticons
        | '\u{1F680}'..='\u{1F6FF}' // transport and map
        | '\u{1F780}'..='\u{1F7FF}' // geometric shapes extended
        | '\u{1F900}'..='\u{1F9FF}' // supplemental symbols and pictographs
        | '\u{1FA70}'..='\u{1FAFF}' // symbols and pictographs extended-A
        | '\u{2600}'..='\u{26FF}' // miscellaneous symbols
        | '\u{2700}'..='\u{27BF}' // dingbats
        | '\u{231A}'..='\u{231B}'
        | '\u{23E9}'..='\u{23F3}'
        | '\u{23F8}'..='\u{23FA}'
        | '\u{2B05}'..='\u{2B07}'
        | '\u{2B1B}'..='\u{2B1C}'
        | '\u{2B50}'
        | '\u{2B55}'
        | '\u{3030}'
        | '\u{303D}'
        | '\u{3297}'
        | '\u{3299}'
    )
}
