//! Question persistence, including tag attachment

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Query;
use sea_orm::*;

use askme_common::AskError;

use super::{
    ExternalDbPersistService, adjust_tag_ratings, delete_question_in, detach_all_tags, offset,
    usernames,
};
use crate::entity::{question_tags, questions, tags};
use crate::model::{
    NewQuestion, Page, QuestionFilter, QuestionInfo, QuestionSort, QuestionUpdate, TagInfo,
};
use crate::traits::QuestionPersistence;

/// Resolve author names and tag names for a batch of questions
pub(super) async fn hydrate_questions<C: ConnectionTrait>(
    conn: &C,
    models: Vec<questions::Model>,
) -> anyhow::Result<Vec<QuestionInfo>> {
    if models.is_empty() {
        return Ok(vec![]);
    }

    let question_ids: Vec<i32> = models.iter().map(|m| m.id).collect();
    let authors = usernames(conn, models.iter().map(|m| m.author_id).collect()).await?;

    let links = question_tags::Entity::find()
        .filter(question_tags::Column::QuestionId.is_in(question_ids))
        .all(conn)
        .await?;

    let tag_names: HashMap<i32, String> = if links.is_empty() {
        HashMap::new()
    } else {
        tags::Entity::find()
            .filter(tags::Column::Id.is_in(links.iter().map(|l| l.tag_id)))
            .all(conn)
            .await?
            .into_iter()
            .map(|t| (t.id, t.name))
            .collect()
    };

    let mut tags_by_question: HashMap<i32, Vec<String>> = HashMap::new();
    for link in links {
        if let Some(name) = tag_names.get(&link.tag_id) {
            tags_by_question
                .entry(link.question_id)
                .or_default()
                .push(name.clone());
        }
    }

    let infos = models
        .into_iter()
        .map(|m| {
            let mut tags = tags_by_question.remove(&m.id).unwrap_or_default();
            tags.sort();
            QuestionInfo {
                id: m.id,
                title: m.title,
                long_text: m.long_text,
                author_id: m.author_id,
                author: authors.get(&m.author_id).cloned().unwrap_or_default(),
                created: m.created,
                rating: m.rating,
                count_answers: m.count_answers,
                tags,
            }
        })
        .collect();

    Ok(infos)
}

/// Find or create the tag, then link it to the question.
///
/// The tag gains one rating point per question it is attached to; a link
/// that already exists leaves the rating untouched.
pub(super) async fn attach_tag<C: ConnectionTrait>(
    conn: &C,
    question_id: i32,
    name: &str,
) -> anyhow::Result<TagInfo> {
    let tag = match tags::Entity::find()
        .filter(tags::Column::Name.eq(name))
        .one(conn)
        .await?
    {
        Some(tag) => tag,
        None => {
            tags::ActiveModel {
                name: Set(name.to_string()),
                rating: Set(0),
                ..Default::default()
            }
            .insert(conn)
            .await?
        }
    };

    let linked = question_tags::Entity::find_by_id((question_id, tag.id))
        .one(conn)
        .await?
        .is_some();
    if linked {
        return Ok(TagInfo::from(tag));
    }

    question_tags::Entity::insert(question_tags::ActiveModel {
        question_id: Set(question_id),
        tag_id: Set(tag.id),
    })
    .exec_without_returning(conn)
    .await?;

    adjust_tag_ratings(conn, vec![tag.id], 1).await?;

    Ok(TagInfo {
        rating: tag.rating + 1,
        ..TagInfo::from(tag)
    })
}

/// Keep the first occurrence of every tag name
fn dedup_names(names: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

#[async_trait]
impl QuestionPersistence for ExternalDbPersistService {
    async fn question_create(
        &self,
        author_id: i32,
        question: NewQuestion,
    ) -> anyhow::Result<QuestionInfo> {
        let txn = self.db.begin().await?;

        if crate::entity::users::Entity::find_by_id(author_id)
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(AskError::UserNotExist(author_id.to_string()).into());
        }

        let model = questions::ActiveModel {
            title: Set(question.title),
            long_text: Set(question.long_text),
            author_id: Set(author_id),
            created: Set(Utc::now()),
            rating: Set(0),
            count_answers: Set(0),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for name in dedup_names(question.tags) {
            attach_tag(&txn, model.id, &name).await?;
        }

        let info = hydrate_questions(&txn, vec![model]).await?.pop();

        txn.commit().await?;

        info.ok_or_else(|| {
            AskError::InternalError("question vanished after insert".to_string()).into()
        })
    }

    async fn question_find_by_id(&self, id: i32) -> anyhow::Result<Option<QuestionInfo>> {
        let Some(model) = questions::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        Ok(hydrate_questions(&self.db, vec![model]).await?.pop())
    }

    async fn question_find_page(
        &self,
        filter: QuestionFilter,
        sort: Option<QuestionSort>,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<QuestionInfo>> {
        let mut query = questions::Entity::find();

        if let Some(tag_id) = filter.tag_id {
            query = query.filter(
                questions::Column::Id.in_subquery(
                    Query::select()
                        .column(question_tags::Column::QuestionId)
                        .from(question_tags::Entity)
                        .and_where(question_tags::Column::TagId.eq(tag_id))
                        .to_owned(),
                ),
            );
        }
        if let Some(author_id) = filter.author_id {
            query = query.filter(questions::Column::AuthorId.eq(author_id));
        }

        let total_count = query.clone().count(&self.db).await?;

        if total_count == 0 {
            return Ok(Page::new(0, page_no, page_size, vec![]));
        }

        let query = match sort {
            Some(QuestionSort::Rating) => query.order_by_desc(questions::Column::Rating),
            Some(QuestionSort::CountAnswers) => {
                query.order_by_desc(questions::Column::CountAnswers)
            }
            Some(QuestionSort::Created) | None => query.order_by_desc(questions::Column::Created),
        };

        let models = query
            .order_by_desc(questions::Column::Id)
            .offset(offset(page_no, page_size))
            .limit(page_size)
            .all(&self.db)
            .await?;

        let page_items = hydrate_questions(&self.db, models).await?;

        Ok(Page::new(total_count, page_no, page_size, page_items))
    }

    async fn question_update(
        &self,
        id: i32,
        update: QuestionUpdate,
    ) -> anyhow::Result<QuestionInfo> {
        let txn = self.db.begin().await?;

        let Some(model) = questions::Entity::find_by_id(id).one(&txn).await? else {
            return Err(AskError::QuestionNotExist(id).into());
        };

        let original = model.clone();
        let mut entity: questions::ActiveModel = model.into();
        if let Some(title) = update.title {
            entity.title = Set(title);
        }
        if let Some(long_text) = update.long_text {
            entity.long_text = Set(long_text);
        }
        let model = if entity.is_changed() {
            entity.update(&txn).await?
        } else {
            original
        };

        if let Some(tags) = update.tags {
            detach_all_tags(&txn, id).await?;
            for name in dedup_names(tags) {
                attach_tag(&txn, id, &name).await?;
            }
        }

        let info = hydrate_questions(&txn, vec![model]).await?.pop();

        txn.commit().await?;

        info.ok_or_else(|| AskError::QuestionNotExist(id).into())
    }

    async fn question_delete(&self, id: i32) -> anyhow::Result<bool> {
        let txn = self.db.begin().await?;

        if questions::Entity::find_by_id(id).one(&txn).await?.is_none() {
            return Ok(false);
        }

        delete_question_in(&txn, id).await?;

        txn.commit().await?;

        Ok(true)
    }

    async fn question_add_tag(&self, id: i32, name: &str) -> anyhow::Result<TagInfo> {
        let txn = self.db.begin().await?;

        if questions::Entity::find_by_id(id).one(&txn).await?.is_none() {
            return Err(AskError::QuestionNotExist(id).into());
        }

        let tag = attach_tag(&txn, id, name).await?;

        txn.commit().await?;

        Ok(tag)
    }
}
