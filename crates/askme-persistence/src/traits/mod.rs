//! Persistence traits for the storage abstraction layer
//!
//! Handlers and commands only talk to `PersistenceService`; the SQL
//! backend in `crate::sql` is the production implementation.

pub mod answer;
pub mod like;
pub mod question;
pub mod tag;
pub mod token;
pub mod user;

pub use answer::AnswerPersistence;
pub use like::LikePersistence;
pub use question::QuestionPersistence;
pub use tag::TagPersistence;
pub use token::TokenPersistence;
pub use user::UserPersistence;

use async_trait::async_trait;

/// Unified persistence service trait
#[async_trait]
pub trait PersistenceService:
    UserPersistence
    + TokenPersistence
    + QuestionPersistence
    + AnswerPersistence
    + TagPersistence
    + LikePersistence
    + Send
    + Sync
{
    /// Health check for the storage backend
    async fn health_check(&self) -> anyhow::Result<()>;
}
