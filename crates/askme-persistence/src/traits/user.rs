//! User persistence trait

use async_trait::async_trait;

use crate::model::{NewUser, Page, ProfileUpdate, UserInfo, UserSort};

#[async_trait]
pub trait UserPersistence: Send + Sync {
    /// Create a user. Fails with `AskError::UserAlreadyExist` on a taken username.
    async fn user_create(&self, user: NewUser) -> anyhow::Result<UserInfo>;

    async fn user_find_by_id(&self, id: i32) -> anyhow::Result<Option<UserInfo>>;

    async fn user_find_by_username(&self, username: &str) -> anyhow::Result<Option<UserInfo>>;

    /// List users ordered by id
    async fn user_find_page(&self, page_no: u64, page_size: u64)
    -> anyhow::Result<Page<UserInfo>>;

    /// Highest ranked users
    async fn user_top(&self, sort: UserSort, limit: u64) -> anyhow::Result<Vec<UserInfo>>;

    async fn user_update_profile(
        &self,
        id: i32,
        update: ProfileUpdate,
    ) -> anyhow::Result<UserInfo>;

    async fn user_set_staff(&self, id: i32, is_staff: bool) -> anyhow::Result<()>;

    /// Delete a user and everything they own, returning the keys of the
    /// revoked tokens. `None` if the user does not exist.
    async fn user_delete(&self, id: i32) -> anyhow::Result<Option<Vec<String>>>;

    async fn user_count(&self) -> anyhow::Result<u64>;
}
