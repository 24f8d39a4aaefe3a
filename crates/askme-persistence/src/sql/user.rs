//! User and profile persistence

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::prelude::Expr;
use sea_orm::*;

use askme_common::{AskError, LikeTarget};

use super::{
    ExternalDbPersistService, adjust_answer_rating, adjust_question_rating, adjust_user_rating,
    delete_answer_in, delete_question_in, is_unique_violation, offset,
};
use crate::entity::{answers, auth_tokens, likes, questions, users};
use crate::model::{NewUser, Page, ProfileUpdate, UserInfo, UserSort};
use crate::traits::UserPersistence;

/// Take back the likes a user handed out, keeping target and author ratings in step
async fn revoke_likes_of<C: ConnectionTrait>(conn: &C, user_id: i32) -> anyhow::Result<()> {
    let given = likes::Entity::find()
        .filter(likes::Column::UserId.eq(user_id))
        .all(conn)
        .await?;

    for like in given {
        let author_id = match like.target_type.as_str() {
            LikeTarget::QUESTION => {
                adjust_question_rating(conn, like.object_id, -1).await?;
                questions::Entity::find_by_id(like.object_id)
                    .one(conn)
                    .await?
                    .map(|q| q.author_id)
            }
            LikeTarget::ANSWER => {
                adjust_answer_rating(conn, like.object_id, -1).await?;
                answers::Entity::find_by_id(like.object_id)
                    .one(conn)
                    .await?
                    .map(|a| a.author_id)
            }
            _ => None,
        };

        if let Some(author_id) = author_id {
            adjust_user_rating(conn, author_id, -1).await?;
        }
    }

    likes::Entity::delete_many()
        .filter(likes::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;

    Ok(())
}

#[async_trait]
impl UserPersistence for ExternalDbPersistService {
    async fn user_create(&self, user: NewUser) -> anyhow::Result<UserInfo> {
        if self.user_find_by_username(&user.username).await?.is_some() {
            return Err(AskError::UserAlreadyExist(user.username).into());
        }

        let entity = users::ActiveModel {
            username: Set(user.username.clone()),
            email: Set(user.email),
            password: Set(user.password_hash),
            avatar: Set(None),
            rating: Set(0),
            is_staff: Set(user.is_staff),
            is_active: Set(true),
            created: Set(Utc::now()),
            ..Default::default()
        };

        match entity.insert(&self.db).await {
            Ok(model) => Ok(UserInfo::from(model)),
            Err(err) if is_unique_violation(&err) => {
                Err(AskError::UserAlreadyExist(user.username).into())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn user_find_by_id(&self, id: i32) -> anyhow::Result<Option<UserInfo>> {
        let user = users::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(UserInfo::from);

        Ok(user)
    }

    async fn user_find_by_username(&self, username: &str) -> anyhow::Result<Option<UserInfo>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await?
            .map(UserInfo::from);

        Ok(user)
    }

    async fn user_find_page(
        &self,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<UserInfo>> {
        let total_count = users::Entity::find().count(&self.db).await?;

        if total_count == 0 {
            return Ok(Page::new(0, page_no, page_size, vec![]));
        }

        let page_items = users::Entity::find()
            .order_by_asc(users::Column::Id)
            .offset(offset(page_no, page_size))
            .limit(page_size)
            .all(&self.db)
            .await?
            .into_iter()
            .map(UserInfo::from)
            .collect();

        Ok(Page::new(total_count, page_no, page_size, page_items))
    }

    async fn user_top(&self, sort: UserSort, limit: u64) -> anyhow::Result<Vec<UserInfo>> {
        let query = match sort {
            UserSort::Rating => users::Entity::find().order_by_desc(users::Column::Rating),
        };

        let users = query
            .order_by_asc(users::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(UserInfo::from)
            .collect();

        Ok(users)
    }

    async fn user_update_profile(
        &self,
        id: i32,
        update: ProfileUpdate,
    ) -> anyhow::Result<UserInfo> {
        let Some(model) = users::Entity::find_by_id(id).one(&self.db).await? else {
            return Err(AskError::UserNotExist(id.to_string()).into());
        };

        let original = model.clone();
        let mut entity: users::ActiveModel = model.into();
        if let Some(email) = update.email {
            entity.email = Set(Some(email));
        }
        if let Some(avatar) = update.avatar {
            entity.avatar = Set(avatar);
        }

        if !entity.is_changed() {
            return Ok(UserInfo::from(original));
        }
        let model = entity.update(&self.db).await?;

        Ok(UserInfo::from(model))
    }

    async fn user_set_staff(&self, id: i32, is_staff: bool) -> anyhow::Result<()> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::IsStaff, Expr::value(is_staff))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AskError::UserNotExist(id.to_string()).into());
        }

        Ok(())
    }

    async fn user_delete(&self, id: i32) -> anyhow::Result<Option<Vec<String>>> {
        let txn = self.db.begin().await?;

        if users::Entity::find_by_id(id).one(&txn).await?.is_none() {
            return Ok(None);
        }

        revoke_likes_of(&txn, id).await?;

        let question_ids = questions::Entity::find()
            .select_only()
            .column(questions::Column::Id)
            .filter(questions::Column::AuthorId.eq(id))
            .into_tuple::<i32>()
            .all(&txn)
            .await?;
        for question_id in question_ids {
            delete_question_in(&txn, question_id).await?;
        }

        let answers = answers::Entity::find()
            .filter(answers::Column::AuthorId.eq(id))
            .all(&txn)
            .await?;
        for answer in &answers {
            delete_answer_in(&txn, answer).await?;
        }

        let token_keys = auth_tokens::Entity::find()
            .select_only()
            .column(auth_tokens::Column::TokenKey)
            .filter(auth_tokens::Column::UserId.eq(id))
            .into_tuple::<String>()
            .all(&txn)
            .await?;

        auth_tokens::Entity::delete_many()
            .filter(auth_tokens::Column::UserId.eq(id))
            .exec(&txn)
            .await?;

        users::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        Ok(Some(token_keys))
    }

    async fn user_count(&self) -> anyhow::Result<u64> {
        let count = users::Entity::find().count(&self.db).await?;
        Ok(count)
    }
}
