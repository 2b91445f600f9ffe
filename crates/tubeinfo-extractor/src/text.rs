//! Input conditioning for extraction prompts

use once_cell::sync::Lazy;
use regex::Regex;

/// Placeholder substituted for embedded URLs before classification
pub const URL_PLACEHOLDER: &str = "[URL]";

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://(?:[A-Za-z0-9$\-_@.&+!*(),]|%[0-9a-fA-F]{2})+")
        .expect("URL pattern is valid")
});

/// Replace every embedded URL with a neutral placeholder.
///
/// Classification input is stripped so incidental links cannot bias the
/// category; song attribute extraction must NOT use this, since
/// `original_url` has to stay recoverable from the raw text.
pub fn strip_urls(text: &str) -> String {
    URL_PATTERN.replace_all(text, URL_PLACEHOLDER).into_owned()
}

/// Truncate to at most `max` characters, on a char boundary
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Trimmed, non-empty text or None. Optional attribute fields are
/// represented as absent, never as empty-string placeholders.
pub fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == text.len() {
        Some(text)
    } else {
        Some(trimmed.to_string())
    }
}
