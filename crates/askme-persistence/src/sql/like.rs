//! Like toggling
//!
//! A like moves three numbers at once: the like row itself, the rating of
//! the liked question or answer, and the rating of that object's author.

use async_trait::async_trait;
use sea_orm::*;

use askme_common::{AskError, LikeTarget};

use super::{
    ExternalDbPersistService, adjust_answer_rating, adjust_question_rating, adjust_user_rating,
    is_unique_violation,
};
use crate::entity::{answers, likes, questions};
use crate::model::LikeOutcome;
use crate::traits::LikePersistence;

/// Author id and current rating of a like target
async fn target_state<C: ConnectionTrait>(
    conn: &C,
    target: LikeTarget,
) -> anyhow::Result<(i32, i32)> {
    match target {
        LikeTarget::Question(id) => questions::Entity::find_by_id(id)
            .one(conn)
            .await?
            .map(|q| (q.author_id, q.rating))
            .ok_or_else(|| AskError::QuestionNotExist(id).into()),
        LikeTarget::Answer(id) => answers::Entity::find_by_id(id)
            .one(conn)
            .await?
            .map(|a| (a.author_id, a.rating))
            .ok_or_else(|| AskError::AnswerNotExist(id).into()),
    }
}

async fn adjust_target_rating<C: ConnectionTrait>(
    conn: &C,
    target: LikeTarget,
    delta: i32,
) -> anyhow::Result<()> {
    match target {
        LikeTarget::Question(id) => adjust_question_rating(conn, id, delta).await,
        LikeTarget::Answer(id) => adjust_answer_rating(conn, id, delta).await,
    }
}

fn like_filter(user_id: i32, target: LikeTarget) -> Condition {
    Condition::all()
        .add(likes::Column::UserId.eq(user_id))
        .add(likes::Column::TargetType.eq(target.type_name()))
        .add(likes::Column::ObjectId.eq(target.object_id()))
}

#[async_trait]
impl LikePersistence for ExternalDbPersistService {
    async fn like_toggle(&self, user_id: i32, target: LikeTarget) -> anyhow::Result<LikeOutcome> {
        let txn = self.db.begin().await?;

        let (author_id, _) = target_state(&txn, target).await?;

        let existing = likes::Entity::find()
            .filter(like_filter(user_id, target))
            .one(&txn)
            .await?;

        let (liked, delta) = match existing {
            Some(like) => {
                // a concurrent toggle may already have removed the row
                let removed = likes::Entity::delete_by_id(like.id)
                    .exec(&txn)
                    .await?
                    .rows_affected;
                (false, if removed == 1 { -1 } else { 0 })
            }
            None => {
                let inserted = likes::ActiveModel {
                    user_id: Set(user_id),
                    target_type: Set(target.type_name().to_string()),
                    object_id: Set(target.object_id()),
                    ..Default::default()
                }
                .insert(&txn)
                .await;

                match inserted {
                    Ok(_) => (true, 1),
                    Err(e) if is_unique_violation(&e) => {
                        txn.rollback().await?;
                        let (_, rating) = target_state(&self.db, target).await?;
                        tracing::debug!(user_id, %target, "like already recorded");
                        return Ok(LikeOutcome {
                            liked: true,
                            rating,
                        });
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        };

        if delta != 0 {
            adjust_target_rating(&txn, target, delta).await?;
            adjust_user_rating(&txn, author_id, delta).await?;
        }

        let (_, rating) = target_state(&txn, target).await?;

        txn.commit().await?;

        tracing::debug!(user_id, %target, liked, "like toggled");

        Ok(LikeOutcome { liked, rating })
    }

    async fn like_exists(&self, user_id: i32, target: LikeTarget) -> anyhow::Result<bool> {
        let count = likes::Entity::find()
            .filter(like_filter(user_id, target))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}
