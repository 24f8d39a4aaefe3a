//! Answer persistence

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::prelude::Expr;
use sea_orm::*;

use askme_common::AskError;

use super::{ExternalDbPersistService, adjust_answer_count, delete_answer_in, offset, usernames};
use crate::entity::{answers, questions};
use crate::model::{AnswerInfo, Page};
use crate::traits::AnswerPersistence;

async fn hydrate_answers<C: ConnectionTrait>(
    conn: &C,
    models: Vec<answers::Model>,
) -> anyhow::Result<Vec<AnswerInfo>> {
    let authors = usernames(conn, models.iter().map(|m| m.author_id).collect()).await?;

    Ok(models
        .into_iter()
        .map(|m| {
            let author = authors.get(&m.author_id).cloned().unwrap_or_default();
            AnswerInfo::from_model(m, author)
        })
        .collect())
}

#[async_trait]
impl AnswerPersistence for ExternalDbPersistService {
    async fn answer_create(
        &self,
        question_id: i32,
        author_id: i32,
        text: &str,
    ) -> anyhow::Result<AnswerInfo> {
        let txn = self.db.begin().await?;

        if questions::Entity::find_by_id(question_id)
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(AskError::QuestionNotExist(question_id).into());
        }

        let model = answers::ActiveModel {
            text: Set(text.to_string()),
            author_id: Set(author_id),
            question_id: Set(question_id),
            created: Set(Utc::now()),
            right_answer: Set(false),
            rating: Set(0),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        adjust_answer_count(&txn, question_id, 1).await?;

        let author = usernames(&txn, vec![author_id])
            .await?
            .remove(&author_id)
            .ok_or_else(|| AskError::UserNotExist(author_id.to_string()))?;

        txn.commit().await?;

        Ok(AnswerInfo::from_model(model, author))
    }

    async fn answer_find_by_id(&self, id: i32) -> anyhow::Result<Option<AnswerInfo>> {
        let Some(model) = answers::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        Ok(hydrate_answers(&self.db, vec![model]).await?.pop())
    }

    async fn answer_find_page(
        &self,
        question_id: Option<i32>,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<AnswerInfo>> {
        let mut query = answers::Entity::find();
        if let Some(question_id) = question_id {
            query = query.filter(answers::Column::QuestionId.eq(question_id));
        }

        let total_count = query.clone().count(&self.db).await?;

        if total_count == 0 {
            return Ok(Page::new(0, page_no, page_size, vec![]));
        }

        let models = query
            .order_by_desc(answers::Column::Rating)
            .order_by_asc(answers::Column::Created)
            .order_by_asc(answers::Column::Id)
            .offset(offset(page_no, page_size))
            .limit(page_size)
            .all(&self.db)
            .await?;

        let page_items = hydrate_answers(&self.db, models).await?;

        Ok(Page::new(total_count, page_no, page_size, page_items))
    }

    async fn answer_update_text(&self, id: i32, text: &str) -> anyhow::Result<AnswerInfo> {
        let result = answers::Entity::update_many()
            .col_expr(answers::Column::Text, Expr::value(text))
            .filter(answers::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AskError::AnswerNotExist(id).into());
        }

        self.answer_find_by_id(id)
            .await?
            .ok_or_else(|| AskError::AnswerNotExist(id).into())
    }

    async fn answer_delete(&self, id: i32) -> anyhow::Result<bool> {
        let txn = self.db.begin().await?;

        let Some(model) = answers::Entity::find_by_id(id).one(&txn).await? else {
            return Ok(false);
        };

        delete_answer_in(&txn, &model).await?;

        txn.commit().await?;

        Ok(true)
    }

    async fn answer_mark_right(&self, id: i32) -> anyhow::Result<AnswerInfo> {
        let result = answers::Entity::update_many()
            .col_expr(answers::Column::RightAnswer, Expr::value(true))
            .filter(answers::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AskError::AnswerNotExist(id).into());
        }

        self.answer_find_by_id(id)
            .await?
            .ok_or_else(|| AskError::AnswerNotExist(id).into())
    }
}
