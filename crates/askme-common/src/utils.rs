//! Utility functions for AskMe
//!
//! Text helpers used across the codebase.

use std::sync::LazyLock;

use crate::{SHORT_TEXT_LENGTH, TAG_NAME_MAX_LENGTH, USERNAME_MAX_LENGTH};

static USERNAME_PATTERN: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[A-Za-z0-9_.@+-]+$").expect("Invalid regex pattern"));

static TAG_PATTERN: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[\w.#+-]+$").expect("Invalid regex pattern"));

/// Validate a username
///
/// Allowed characters: letters, digits, and `_ . @ + -`
///
/// # Examples
///
/// ```
/// use askme_common::is_valid_username;
///
/// assert!(is_valid_username("alice.smith"));
/// assert!(!is_valid_username("with spaces"));
/// assert!(!is_valid_username(""));
/// ```
pub fn is_valid_username(username: &str) -> bool {
    username.chars().count() as u64 <= USERNAME_MAX_LENGTH && USERNAME_PATTERN.is_match(username)
}

/// Validate a tag name: a single word of at most 20 characters
pub fn is_valid_tag_name(name: &str) -> bool {
    name.chars().count() as u64 <= TAG_NAME_MAX_LENGTH && TAG_PATTERN.is_match(name)
}

/// Preview of a question body
///
/// Keeps the first 100 characters and appends an ellipsis when the text
/// was cut. Counts characters, not bytes.
///
/// # Examples
///
/// ```
/// use askme_common::short_text;
///
/// assert_eq!(short_text("how to?"), "how to?");
/// assert!(short_text(&"a".repeat(150)).ends_with('…'));
/// ```
pub fn short_text(text: &str) -> String {
    match text.char_indices().nth(SHORT_TEXT_LENGTH) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_valid_usernames() {
        assert!(is_valid_username("alice"));
        assert!(is_valid_username("test_admin"));
        assert!(is_valid_username("bob+qa@example.com"));
        assert!(!is_valid_username("bob smith"));
        assert!(!is_valid_username("bob/smith"));
        assert!(!is_valid_username(&"a".repeat(151)));
    }

    #[test]
    fn test_valid_tag_names() {
        assert!(is_valid_tag_name("rust"));
        assert!(is_valid_tag_name("c++"));
        assert!(is_valid_tag_name("c#"));
        assert!(is_valid_tag_name("питон"));
        assert!(!is_valid_tag_name(""));
        assert!(!is_valid_tag_name("two words"));
        assert!(!is_valid_tag_name(&"x".repeat(21)));
    }

    #[test]
    fn test_short_text_keeps_short_input() {
        assert_eq!(short_text(""), "");
        assert_eq!(short_text(&"b".repeat(100)), "b".repeat(100));
    }

    #[test]
    fn test_short_text_keeps_whitespace_at_cut() {
        let text = format!("{}{}tail", "w".repeat(95), " ".repeat(10));
        let preview = short_text(&text);
        assert_eq!(preview.chars().count(), 101);
        assert_eq!(preview, format!("{}{}…", "w".repeat(95), " ".repeat(5)));
    }

    #[test]
    fn test_short_text_cuts_multibyte() {
        let text = "я".repeat(120);
        let preview = short_text(&text);
        assert_eq!(preview.chars().count(), 101);
        assert!(preview.ends_with('…'));
    }

    proptest! {
        #[test]
        fn short_text_never_exceeds_limit(text in "\\PC{0,300}") {
            let preview = short_text(&text);
            let expected = text.chars().count().min(SHORT_TEXT_LENGTH);
            let cut = text.chars().count() > SHORT_TEXT_LENGTH;
            prop_assert_eq!(preview.chars().count(), expected + usize::from(cut));
            let kept = preview.trim_end_matches('…');
            prop_assert!(text.starts_with(kept));
        }
    }
}
