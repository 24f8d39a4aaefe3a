//! Tag persistence

use async_trait::async_trait;
use sea_orm::sea_query::Query;
use sea_orm::*;

use askme_common::AskError;

use super::{ExternalDbPersistService, is_unique_violation, offset};
use crate::entity::{question_tags, tags};
use crate::model::{Page, TagInfo, TagSort};
use crate::traits::TagPersistence;

#[async_trait]
impl TagPersistence for ExternalDbPersistService {
    async fn tag_create(&self, name: &str) -> anyhow::Result<TagInfo> {
        if self.tag_find_by_name(name).await?.is_some() {
            return Err(AskError::TagAlreadyExist(name.to_string()).into());
        }

        let entity = tags::ActiveModel {
            name: Set(name.to_string()),
            rating: Set(0),
            ..Default::default()
        };

        match entity.insert(&self.db).await {
            Ok(model) => Ok(TagInfo::from(model)),
            Err(err) if is_unique_violation(&err) => {
                Err(AskError::TagAlreadyExist(name.to_string()).into())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn tag_find_by_id(&self, id: i32) -> anyhow::Result<Option<TagInfo>> {
        let tag = tags::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(TagInfo::from);

        Ok(tag)
    }

    async fn tag_find_by_name(&self, name: &str) -> anyhow::Result<Option<TagInfo>> {
        let tag = tags::Entity::find()
            .filter(tags::Column::Name.eq(name))
            .one(&self.db)
            .await?
            .map(TagInfo::from);

        Ok(tag)
    }

    async fn tag_find_page(&self, page_no: u64, page_size: u64) -> anyhow::Result<Page<TagInfo>> {
        let total_count = tags::Entity::find().count(&self.db).await?;

        if total_count == 0 {
            return Ok(Page::new(0, page_no, page_size, vec![]));
        }

        let page_items = tags::Entity::find()
            .order_by_asc(tags::Column::Name)
            .offset(offset(page_no, page_size))
            .limit(page_size)
            .all(&self.db)
            .await?
            .into_iter()
            .map(TagInfo::from)
            .collect();

        Ok(Page::new(total_count, page_no, page_size, page_items))
    }

    async fn tag_top(&self, sort: TagSort, limit: u64) -> anyhow::Result<Vec<TagInfo>> {
        let query = match sort {
            TagSort::Rating => tags::Entity::find()
                .order_by_desc(tags::Column::Rating)
                .order_by_asc(tags::Column::Name),
            TagSort::Name => tags::Entity::find().order_by_desc(tags::Column::Name),
        };

        let tags = query
            .limit(limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(TagInfo::from)
            .collect();

        Ok(tags)
    }

    async fn tag_find_by_question(&self, question_id: i32) -> anyhow::Result<Vec<TagInfo>> {
        let tags = tags::Entity::find()
            .filter(
                tags::Column::Id.in_subquery(
                    Query::select()
                        .column(question_tags::Column::TagId)
                        .from(question_tags::Entity)
                        .and_where(question_tags::Column::QuestionId.eq(question_id))
                        .to_owned(),
                ),
            )
            .order_by_asc(tags::Column::Name)
            .all(&self.db)
            .await?
            .into_iter()
            .map(TagInfo::from)
            .collect();

        Ok(tags)
    }

    async fn tag_delete(&self, id: i32) -> anyhow::Result<bool> {
        let txn = self.db.begin().await?;

        question_tags::Entity::delete_many()
            .filter(question_tags::Column::TagId.eq(id))
            .exec(&txn)
            .await?;

        let result = tags::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        Ok(result.rows_affected > 0)
    }
}
