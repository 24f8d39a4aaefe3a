//! Login token persistence trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::model::TokenInfo;

#[async_trait]
pub trait TokenPersistence: Send + Sync {
    async fn token_create(
        &self,
        user_id: i32,
        token_key: &str,
        expiry: DateTime<Utc>,
    ) -> anyhow::Result<TokenInfo>;

    /// Find a token that has not expired at `now`
    async fn token_find_valid(
        &self,
        token_key: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<TokenInfo>>;

    async fn token_delete(&self, token_key: &str) -> anyhow::Result<bool>;

    /// Revoke every token of a user, returning the revoked keys
    async fn token_delete_by_user(&self, user_id: i32) -> anyhow::Result<Vec<String>>;

    async fn token_purge_expired(&self, now: DateTime<Utc>) -> anyhow::Result<u64>;
}
