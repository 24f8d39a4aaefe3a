//! Response views and shared request parameters
//!
//! Views render relative URLs under the configured context path; every URL
//! ends with a slash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use askme_common::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, short_text};
use askme_persistence::{AnswerInfo, QuestionInfo, TagInfo, UserInfo};

pub fn user_url(base: &str, id: i32) -> String {
    format!("{}users/{}/", base, id)
}

pub fn profile_url(base: &str, id: i32) -> String {
    format!("{}profiles/{}/", base, id)
}

pub fn question_url(base: &str, id: i32) -> String {
    format!("{}questions/{}/", base, id)
}

pub fn question_answers_url(base: &str, id: i32) -> String {
    format!("{}questions/{}/answers/", base, id)
}

pub fn answer_url(base: &str, id: i32) -> String {
    format!("{}answers/{}/", base, id)
}

pub fn tag_url(base: &str, id: i32) -> String {
    format!("{}tags/{}/", base, id)
}

pub fn tag_questions_url(base: &str, id: i32) -> String {
    format!("{}tags/{}/questions/", base, id)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    pub id: i32,
    pub url: String,
    pub username: String,
    pub rating: i32,
}

impl UserView {
    pub fn new(user: &UserInfo, base: &str) -> Self {
        Self {
            id: user.id,
            url: user_url(base, user.id),
            username: user.username.clone(),
            rating: user.rating,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileView {
    pub id: i32,
    pub url: String,
    pub username: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub rating: i32,
}

impl ProfileView {
    pub fn new(user: &UserInfo, base: &str) -> Self {
        Self {
            id: user.id,
            url: profile_url(base, user.id),
            username: user.username.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
            rating: user.rating,
        }
    }

    /// Profile without the email address, for anonymous listings
    pub fn public(user: &UserInfo, base: &str) -> Self {
        Self {
            email: None,
            ..Self::new(user, base)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionView {
    pub id: i32,
    pub url: String,
    pub title: String,
    pub long_text: String,
    pub short_text: String,
    pub author: String,
    pub created: DateTime<Utc>,
    pub rating: i32,
    pub count_answers: i32,
    pub answers: String,
    pub tags: Vec<String>,
}

impl QuestionView {
    pub fn new(question: QuestionInfo, base: &str) -> Self {
        Self {
            id: question.id,
            url: question_url(base, question.id),
            short_text: short_text(&question.long_text),
            title: question.title,
            long_text: question.long_text,
            author: question.author,
            created: question.created,
            rating: question.rating,
            count_answers: question.count_answers,
            answers: question_answers_url(base, question.id),
            tags: question.tags,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerView {
    pub id: i32,
    pub url: String,
    pub text: String,
    pub author: String,
    pub created: DateTime<Utc>,
    pub right_answer: bool,
    pub rating: i32,
    pub question: String,
}

impl AnswerView {
    pub fn new(answer: AnswerInfo, base: &str) -> Self {
        Self {
            id: answer.id,
            url: answer_url(base, answer.id),
            text: answer.text,
            author: answer.author,
            created: answer.created,
            right_answer: answer.right_answer,
            rating: answer.rating,
            question: question_url(base, answer.question_id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagView {
    pub id: i32,
    pub url: String,
    pub name: String,
    pub rating: i32,
    pub questions: String,
}

impl TagView {
    pub fn new(tag: TagInfo, base: &str) -> Self {
        Self {
            id: tag.id,
            url: tag_url(base, tag.id),
            questions: tag_questions_url(base, tag.id),
            name: tag.name,
            rating: tag.rating,
        }
    }
}

/// `pageNo` / `pageSize` query parameters
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParam {
    pub page_no: Option<u64>,
    pub page_size: Option<u64>,
}

impl PageParam {
    /// Page number starting at 1 and a page size capped at `MAX_PAGE_SIZE`
    pub fn resolve(&self) -> (u64, u64) {
        let page_no = self.page_no.unwrap_or(1).max(1);
        let page_size = self
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        (page_no, page_size)
    }
}

/// `sort` / `limit` query parameters of the top listings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopParam {
    pub sort: Option<String>,
    pub limit: Option<u64>,
}

impl TopParam {
    /// Top listings need both `sort` and `limit`
    pub fn requested(&self) -> bool {
        self.sort.is_some() && self.limit.is_some()
    }

    pub fn limit_or(&self, default: u64) -> u64 {
        self.limit.unwrap_or(default).clamp(1, MAX_PAGE_SIZE)
    }
}
