//! Answer persistence trait

use async_trait::async_trait;

use crate::model::{AnswerInfo, Page};

#[async_trait]
pub trait AnswerPersistence: Send + Sync {
    /// Post an answer and bump the question's answer counter
    async fn answer_create(
        &self,
        question_id: i32,
        author_id: i32,
        text: &str,
    ) -> anyhow::Result<AnswerInfo>;

    async fn answer_find_by_id(&self, id: i32) -> anyhow::Result<Option<AnswerInfo>>;

    /// Answers ordered by rating (desc) then creation time (asc)
    async fn answer_find_page(
        &self,
        question_id: Option<i32>,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<AnswerInfo>>;

    async fn answer_update_text(&self, id: i32, text: &str) -> anyhow::Result<AnswerInfo>;

    async fn answer_delete(&self, id: i32) -> anyhow::Result<bool>;

    async fn answer_mark_right(&self, id: i32) -> anyhow::Result<AnswerInfo>;
}
