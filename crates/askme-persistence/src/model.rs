//! Domain model types for the persistence abstraction layer
//!
//! These types are used as return values from the persistence traits,
//! decoupled from the SeaORM entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use askme_common::AskError;

use crate::entity::{answers, auth_tokens, tags, users};

/// User account as seen by the rest of the application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i32,
    pub username: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password: String,
    pub avatar: Option<String>,
    pub rating: i32,
    pub is_staff: bool,
    pub is_active: bool,
    pub created: DateTime<Utc>,
}

impl From<users::Model> for UserInfo {
    fn from(value: users::Model) -> Self {
        Self {
            id: value.id,
            username: value.username,
            email: value.email,
            password: value.password,
            avatar: value.avatar,
            rating: value.rating,
            is_staff: value.is_staff,
            is_active: value.is_active,
            created: value.created,
        }
    }
}

/// Fields required to create a user; the password is already hashed
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub is_staff: bool,
}

/// Partial profile update. `avatar: Some(None)` clears the avatar.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub avatar: Option<Option<String>>,
}

/// Issued login token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfo {
    pub user_id: i32,
    pub token_key: String,
    pub created: DateTime<Utc>,
    pub expiry: DateTime<Utc>,
}

impl From<auth_tokens::Model> for TokenInfo {
    fn from(value: auth_tokens::Model) -> Self {
        Self {
            user_id: value.user_id,
            token_key: value.token_key,
            created: value.created,
            expiry: value.expiry,
        }
    }
}

/// Question with its author name and tag names resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionInfo {
    pub id: i32,
    pub title: String,
    pub long_text: String,
    pub author_id: i32,
    pub author: String,
    pub created: DateTime<Utc>,
    pub rating: i32,
    pub count_answers: i32,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewQuestion {
    pub title: String,
    pub long_text: String,
    pub tags: Vec<String>,
}

/// Partial question update. `tags: Some(..)` replaces the whole tag list.
#[derive(Debug, Clone, Default)]
pub struct QuestionUpdate {
    pub title: Option<String>,
    pub long_text: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Filters for question listings
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionFilter {
    pub tag_id: Option<i32>,
    pub author_id: Option<i32>,
}

/// Answer with its author name resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerInfo {
    pub id: i32,
    pub question_id: i32,
    pub author_id: i32,
    pub author: String,
    pub text: String,
    pub created: DateTime<Utc>,
    pub right_answer: bool,
    pub rating: i32,
}

impl AnswerInfo {
    pub(crate) fn from_model(value: answers::Model, author: String) -> Self {
        Self {
            id: value.id,
            question_id: value.question_id,
            author_id: value.author_id,
            author,
            text: value.text,
            created: value.created,
            right_answer: value.right_answer,
            rating: value.rating,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagInfo {
    pub id: i32,
    pub name: String,
    pub rating: i32,
}

impl From<tags::Model> for TagInfo {
    fn from(value: tags::Model) -> Self {
        Self {
            id: value.id,
            name: value.name,
            rating: value.rating,
        }
    }
}

/// Result of toggling a like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeOutcome {
    /// `true` when the like was added, `false` when it was removed
    pub liked: bool,
    /// Rating of the liked object after the toggle
    pub rating: i32,
}

/// Generic paginated result
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total_count: u64,
    pub page_number: u64,
    pub pages_available: u64,
    pub page_items: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(total_count: u64, page_number: u64, page_size: u64, page_items: Vec<T>) -> Self {
        Self {
            total_count,
            page_number,
            pages_available: if page_size > 0 {
                total_count.div_ceil(page_size)
            } else {
                0
            },
            page_items,
        }
    }

    pub fn empty() -> Self {
        Self {
            total_count: 0,
            page_number: 0,
            pages_available: 0,
            page_items: Vec::new(),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            total_count: self.total_count,
            page_number: self.page_number,
            pages_available: self.pages_available,
            page_items: self.page_items.into_iter().map(f).collect(),
        }
    }
}

/// Ordering keys accepted by question listings. Always descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionSort {
    Rating,
    Created,
    CountAnswers,
}

impl std::str::FromStr for QuestionSort {
    type Err = AskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('-') {
            "rating" => Ok(QuestionSort::Rating),
            "created" => Ok(QuestionSort::Created),
            "count_answers" => Ok(QuestionSort::CountAnswers),
            other => Err(AskError::IllegalArgument(format!(
                "unsupported sort key: {}",
                other
            ))),
        }
    }
}

/// Ordering keys for the top users listing. Always descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSort {
    Rating,
}

impl std::str::FromStr for UserSort {
    type Err = AskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('-') {
            "rating" => Ok(UserSort::Rating),
            other => Err(AskError::IllegalArgument(format!(
                "unsupported sort key: {}",
                other
            ))),
        }
    }
}

/// Ordering keys for the top tags listing. Always descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSort {
    Rating,
    Name,
}

impl std::str::FromStr for TagSort {
    type Err = AskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('-') {
            "rating" => Ok(TagSort::Rating),
            "name" => Ok(TagSort::Name),
            other => Err(AskError::IllegalArgument(format!(
                "unsupported sort key: {}",
                other
            ))),
        }
    }
}
