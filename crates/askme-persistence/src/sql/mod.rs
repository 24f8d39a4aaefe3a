//! External database persistence backend (MySQL/PostgreSQL/SQLite via SeaORM)
//!
//! Every counter change (`rating`, `count_answers`) is an in-place
//! `UPDATE ... SET x = x + delta` issued inside the same transaction as the
//! row change it mirrors.

mod answer;
mod like;
mod question;
mod tag;
mod token;
mod user;

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::prelude::Expr;
use sea_orm::*;

use crate::entity::{answers, likes, question_tags, questions, tags, users};
use crate::traits::PersistenceService;

/// SeaORM-backed implementation of every persistence trait
#[derive(Clone, Debug)]
pub struct ExternalDbPersistService {
    db: DatabaseConnection,
}

impl ExternalDbPersistService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl PersistenceService for ExternalDbPersistService {
    async fn health_check(&self) -> anyhow::Result<()> {
        self.db.ping().await?;
        Ok(())
    }
}

fn offset(page_no: u64, page_size: u64) -> u64 {
    (page_no.max(1) - 1) * page_size
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

async fn usernames<C: ConnectionTrait>(
    conn: &C,
    ids: Vec<i32>,
) -> anyhow::Result<HashMap<i32, String>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = users::Entity::find()
        .select_only()
        .column(users::Column::Id)
        .column(users::Column::Username)
        .filter(users::Column::Id.is_in(ids))
        .into_tuple::<(i32, String)>()
        .all(conn)
        .await?;

    Ok(rows.into_iter().collect())
}

async fn adjust_user_rating<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    delta: i32,
) -> anyhow::Result<()> {
    users::Entity::update_many()
        .col_expr(
            users::Column::Rating,
            Expr::col(users::Column::Rating).add(delta),
        )
        .filter(users::Column::Id.eq(user_id))
        .exec(conn)
        .await?;
    Ok(())
}

async fn adjust_question_rating<C: ConnectionTrait>(
    conn: &C,
    question_id: i32,
    delta: i32,
) -> anyhow::Result<()> {
    questions::Entity::update_many()
        .col_expr(
            questions::Column::Rating,
            Expr::col(questions::Column::Rating).add(delta),
        )
        .filter(questions::Column::Id.eq(question_id))
        .exec(conn)
        .await?;
    Ok(())
}

async fn adjust_answer_count<C: ConnectionTrait>(
    conn: &C,
    question_id: i32,
    delta: i32,
) -> anyhow::Result<()> {
    questions::Entity::update_many()
        .col_expr(
            questions::Column::CountAnswers,
            Expr::col(questions::Column::CountAnswers).add(delta),
        )
        .filter(questions::Column::Id.eq(question_id))
        .exec(conn)
        .await?;
    Ok(())
}

async fn adjust_answer_rating<C: ConnectionTrait>(
    conn: &C,
    answer_id: i32,
    delta: i32,
) -> anyhow::Result<()> {
    answers::Entity::update_many()
        .col_expr(
            answers::Column::Rating,
            Expr::col(answers::Column::Rating).add(delta),
        )
        .filter(answers::Column::Id.eq(answer_id))
        .exec(conn)
        .await?;
    Ok(())
}

async fn adjust_tag_ratings<C: ConnectionTrait>(
    conn: &C,
    tag_ids: Vec<i32>,
    delta: i32,
) -> anyhow::Result<()> {
    if tag_ids.is_empty() {
        return Ok(());
    }

    tags::Entity::update_many()
        .col_expr(tags::Column::Rating, Expr::col(tags::Column::Rating).add(delta))
        .filter(tags::Column::Id.is_in(tag_ids))
        .exec(conn)
        .await?;
    Ok(())
}

/// Detach every tag from a question, taking one point off each tag
async fn detach_all_tags<C: ConnectionTrait>(conn: &C, question_id: i32) -> anyhow::Result<()> {
    let tag_ids = question_tags::Entity::find()
        .select_only()
        .column(question_tags::Column::TagId)
        .filter(question_tags::Column::QuestionId.eq(question_id))
        .into_tuple::<i32>()
        .all(conn)
        .await?;

    adjust_tag_ratings(conn, tag_ids, -1).await?;

    question_tags::Entity::delete_many()
        .filter(question_tags::Column::QuestionId.eq(question_id))
        .exec(conn)
        .await?;

    Ok(())
}

/// Remove an answer together with its likes and its share of `count_answers`
async fn delete_answer_in<C: ConnectionTrait>(
    conn: &C,
    answer: &answers::Model,
) -> anyhow::Result<()> {
    likes::Entity::delete_many()
        .filter(likes::Column::TargetType.eq(askme_common::LikeTarget::ANSWER))
        .filter(likes::Column::ObjectId.eq(answer.id))
        .exec(conn)
        .await?;

    adjust_answer_count(conn, answer.question_id, -1).await?;

    answers::Entity::delete_by_id(answer.id).exec(conn).await?;

    Ok(())
}

/// Remove a question with its answers, likes and tag links
async fn delete_question_in<C: ConnectionTrait>(conn: &C, question_id: i32) -> anyhow::Result<()> {
    let answer_ids = answers::Entity::find()
        .select_only()
        .column(answers::Column::Id)
        .filter(answers::Column::QuestionId.eq(question_id))
        .into_tuple::<i32>()
        .all(conn)
        .await?;

    if !answer_ids.is_empty() {
        likes::Entity::delete_many()
            .filter(likes::Column::TargetType.eq(askme_common::LikeTarget::ANSWER))
            .filter(likes::Column::ObjectId.is_in(answer_ids))
            .exec(conn)
            .await?;
    }

    likes::Entity::delete_many()
        .filter(likes::Column::TargetType.eq(askme_common::LikeTarget::QUESTION))
        .filter(likes::Column::ObjectId.eq(question_id))
        .exec(conn)
        .await?;

    detach_all_tags(conn, question_id).await?;

    answers::Entity::delete_many()
        .filter(answers::Column::QuestionId.eq(question_id))
        .exec(conn)
        .await?;

    questions::Entity::delete_by_id(question_id)
        .exec(conn)
        .await?;

    Ok(())
}
