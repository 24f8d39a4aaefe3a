//! Login token persistence

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::*;

use super::ExternalDbPersistService;
use crate::entity::auth_tokens;
use crate::model::TokenInfo;
use crate::traits::TokenPersistence;

#[async_trait]
impl TokenPersistence for ExternalDbPersistService {
    async fn token_create(
        &self,
        user_id: i32,
        token_key: &str,
        expiry: DateTime<Utc>,
    ) -> anyhow::Result<TokenInfo> {
        let entity = auth_tokens::ActiveModel {
            user_id: Set(user_id),
            token_key: Set(token_key.to_string()),
            created: Set(Utc::now()),
            expiry: Set(expiry),
            ..Default::default()
        };

        let model = entity.insert(&self.db).await?;

        Ok(TokenInfo::from(model))
    }

    async fn token_find_valid(
        &self,
        token_key: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<TokenInfo>> {
        let token = auth_tokens::Entity::find()
            .filter(auth_tokens::Column::TokenKey.eq(token_key))
            .filter(auth_tokens::Column::Expiry.gt(now))
            .one(&self.db)
            .await?
            .map(TokenInfo::from);

        Ok(token)
    }

    async fn token_delete(&self, token_key: &str) -> anyhow::Result<bool> {
        let result = auth_tokens::Entity::delete_many()
            .filter(auth_tokens::Column::TokenKey.eq(token_key))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn token_delete_by_user(&self, user_id: i32) -> anyhow::Result<Vec<String>> {
        let keys = auth_tokens::Entity::find()
            .select_only()
            .column(auth_tokens::Column::TokenKey)
            .filter(auth_tokens::Column::UserId.eq(user_id))
            .into_tuple::<String>()
            .all(&self.db)
            .await?;

        auth_tokens::Entity::delete_many()
            .filter(auth_tokens::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        Ok(keys)
    }

    async fn token_purge_expired(&self, now: DateTime<Utc>) -> anyhow::Result<u64> {
        let result = auth_tokens::Entity::delete_many()
            .filter(auth_tokens::Column::Expiry.lte(now))
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            tracing::debug!("purged {} expired tokens", result.rows_affected);
        }

        Ok(result.rows_affected)
    }
}
