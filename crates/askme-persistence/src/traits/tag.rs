//! Tag persistence trait

use async_trait::async_trait;

use crate::model::{Page, TagInfo, TagSort};

#[async_trait]
pub trait TagPersistence: Send + Sync {
    /// Create a tag. Fails with `AskError::TagAlreadyExist` on a taken name.
    async fn tag_create(&self, name: &str) -> anyhow::Result<TagInfo>;

    async fn tag_find_by_id(&self, id: i32) -> anyhow::Result<Option<TagInfo>>;

    async fn tag_find_by_name(&self, name: &str) -> anyhow::Result<Option<TagInfo>>;

    /// List tags ordered by name
    async fn tag_find_page(&self, page_no: u64, page_size: u64) -> anyhow::Result<Page<TagInfo>>;

    async fn tag_top(&self, sort: TagSort, limit: u64) -> anyhow::Result<Vec<TagInfo>>;

    async fn tag_find_by_question(&self, question_id: i32) -> anyhow::Result<Vec<TagInfo>>;

    async fn tag_delete(&self, id: i32) -> anyhow::Result<bool>;
}
