//! AskMe Common - Shared types and utilities
//!
//! This crate provides the foundational types used across all AskMe components:
//! - Error types and error codes
//! - Text helpers shared by persistence and the HTTP layer
//! - Common constants

pub mod error;
pub mod utils;

// Re-exports for convenience
pub use error::{AskError, ErrorCode};
pub use utils::{is_valid_tag_name, is_valid_username, short_text};

/// Maximum length of a question title
pub const TITLE_MAX_LENGTH: u64 = 100;

/// Maximum length of a tag name
pub const TAG_NAME_MAX_LENGTH: u64 = 20;

/// Maximum length of a username
pub const USERNAME_MAX_LENGTH: u64 = 150;

/// Number of characters kept in a question preview
pub const SHORT_TEXT_LENGTH: usize = 100;

/// Default page size for list endpoints
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Upper bound for any page size or top-N limit
pub const MAX_PAGE_SIZE: u64 = 100;

/// Query parameter names
pub const PAGE_NO: &str = "pageNo";
pub const PAGE_SIZE: &str = "pageSize";
pub const SORT: &str = "sort";
pub const LIMIT: &str = "limit";

/// Target of a like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LikeTarget {
    Question(i32),
    Answer(i32),
}

impl LikeTarget {
    pub const QUESTION: &'static str = "question";
    pub const ANSWER: &'static str = "answer";

    pub fn type_name(self) -> &'static str {
        match self {
            LikeTarget::Question(_) => Self::QUESTION,
            LikeTarget::Answer(_) => Self::ANSWER,
        }
    }

    pub fn object_id(self) -> i32 {
        match self {
            LikeTarget::Question(id) | LikeTarget::Answer(id) => id,
        }
    }
}

impl std::fmt::Display for LikeTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.type_name(), self.object_id())
    }
}
