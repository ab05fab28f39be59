//! Free-text sanitization policies
//!
//! The sell form stores seller-supplied descriptions. Under [`SanitizationPolicy::Strict`]
//! the text is reduced to plain, markup-free content before it reaches storage, so
//! templates may render it without escaping. Under [`SanitizationPolicy::None`] the
//! text is stored verbatim and must be escaped at render time.

use ammonia::Builder;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Maximum length (in characters) of strictly sanitized text
pub const MAX_SANITIZED_LENGTH: usize = 2000;

static PROTOCOL_REGEX: OnceLock<Regex> = OnceLock::new();

/// How seller-supplied free text is treated before storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SanitizationPolicy {
    /// Store input unchanged
    None,
    /// Strip markup, attributes and protocols; collapse whitespace; truncate
    Strict,
}

impl SanitizationPolicy {
    pub fn sanitize<'a>(&self, input: &'a str) -> Cow<'a, str> {
        match self {
            SanitizationPolicy::None => Cow::Borrowed(input),
            SanitizationPolicy::Strict => Cow::Owned(strict_sanitize(input)),
        }
    }
}

/// Reduce arbitrary text to markup-free content.
///
/// Tags, attributes and comments are removed (the contents of `script` and
/// `style` elements go with them), remaining `<`, `>` and `&` come out as
/// character references, script-capable and `scheme://` prefixes are dropped,
/// whitespace runs collapse to one space, and the result is cut to
/// [`MAX_SANITIZED_LENGTH`] characters. Applying it twice gives the same result
/// as applying it once.
pub fn strict_sanitize(input: &str) -> String {
    let cleaned = Builder::empty()
        .clean_content_tags(HashSet::from(["script", "style"]))
        .strip_comments(true)
        .clean(input)
        .to_string();

    let without_protocols = strip_protocols(&cleaned);
    let collapsed = collapse_whitespace(&without_protocols);

    truncate_chars(&collapsed, MAX_SANITIZED_LENGTH).to_string()
}

fn protocol_regex() -> &'static Regex {
    PROTOCOL_REGEX.get_or_init(|| {
        Regex::new(r"(?i)(?:java|vb|live)script\s*:|mocha\s*:|data\s*:|[a-z][a-z0-9+.\-]*://")
            .unwrap()
    })
}

/// Remove protocol prefixes until none remain, so that removals cannot splice
/// a new prefix together ("javajavascript:script:").
fn strip_protocols(text: &str) -> String {
    let regex = protocol_regex();
    let mut current = text.to_string();
    while regex.is_match(&current) {
        current = regex.replace_all(&current, "").into_owned();
    }
    current
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut to at most `max_chars` characters without leaving half a character
/// reference or trailing whitespace behind.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    let Some((byte_index, _)) = text.char_indices().nth(max_chars) else {
        return text;
    };

    let mut cut = &text[..byte_index];
    if let Some(amp) = cut.rfind('&') {
        if !cut[amp..].contains(';') {
            cut = &cut[..amp];
        }
    }
    cut.trim_end()
}
