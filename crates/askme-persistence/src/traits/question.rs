//! Question persistence trait

use async_trait::async_trait;

use crate::model::{
    NewQuestion, Page, QuestionFilter, QuestionInfo, QuestionSort, QuestionUpdate, TagInfo,
};

#[async_trait]
pub trait QuestionPersistence: Send + Sync {
    /// Create a question and attach its tags, creating missing ones
    async fn question_create(
        &self,
        author_id: i32,
        question: NewQuestion,
    ) -> anyhow::Result<QuestionInfo>;

    async fn question_find_by_id(&self, id: i32) -> anyhow::Result<Option<QuestionInfo>>;

    /// Search questions. Without a sort key the newest come first.
    async fn question_find_page(
        &self,
        filter: QuestionFilter,
        sort: Option<QuestionSort>,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<QuestionInfo>>;

    async fn question_update(
        &self,
        id: i32,
        update: QuestionUpdate,
    ) -> anyhow::Result<QuestionInfo>;

    /// Delete a question with its answers and likes. Returns `false` if absent.
    async fn question_delete(&self, id: i32) -> anyhow::Result<bool>;

    /// Attach one tag by name. Already attached tags are returned unchanged.
    async fn question_add_tag(&self, id: i32, name: &str) -> anyhow::Result<TagInfo>;
}
