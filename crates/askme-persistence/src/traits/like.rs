//! Like persistence trait

use askme_common::LikeTarget;
use async_trait::async_trait;

use crate::model::LikeOutcome;

#[async_trait]
pub trait LikePersistence: Send + Sync {
    /// Add the like if absent, remove it otherwise. The target's rating and
    /// its author's rating move together with the like row.
    async fn like_toggle(&self, user_id: i32, target: LikeTarget) -> anyhow::Result<LikeOutcome>;

    async fn like_exists(&self, user_id: i32, target: LikeTarget) -> anyhow::Result<bool>;
}
