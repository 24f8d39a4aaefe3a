//! Tag endpoints

use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, post, web};

use askme_common::AskError;
use askme_persistence::{QuestionFilter, TagSort};

use crate::api::model::{PageParam, QuestionView, TagView, TopParam};
use crate::api::question::{TagForm, check_tag_names};
use crate::error::AppError;
use crate::model::AppState;
use crate::secured;

/// Top tags when `sort` or `limit` is given, otherwise all tags by name
#[get("/")]
async fn search(
    data: web::Data<AppState>,
    page: web::Query<PageParam>,
    top: web::Query<TopParam>,
) -> Result<HttpResponse, AppError> {
    let base = data.base_url();

    if top.requested() {
        let sort = top
            .sort
            .as_deref()
            .map(str::parse::<TagSort>)
            .transpose()?
            .unwrap_or(TagSort::Rating);
        let limit = top.limit_or(data.configuration.rating_top_limit());

        let tags: Vec<TagView> = data
            .persistence()
            .tag_top(sort, limit)
            .await?
            .into_iter()
            .map(|t| TagView::new(t, base))
            .collect();

        return Ok(HttpResponse::Ok().json(tags));
    }

    let (page_no, page_size) = page.resolve();
    let result = data.persistence().tag_find_page(page_no, page_size).await?;

    Ok(HttpResponse::Ok().json(result.map(|t| TagView::new(t, base))))
}

#[post("/")]
async fn create(
    req: HttpRequest,
    data: web::Data<AppState>,
    form: web::Json<TagForm>,
) -> Result<HttpResponse, AppError> {
    secured::authenticated(&req, &data).await?;
    check_tag_names(std::slice::from_ref(&form.name))?;

    let tag = data.persistence().tag_create(&form.name).await?;

    Ok(HttpResponse::Created().json(TagView::new(tag, data.base_url())))
}

#[get("/{id}/")]
async fn detail(data: web::Data<AppState>, path: web::Path<i32>) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let tag = data
        .persistence()
        .tag_find_by_id(id)
        .await?
        .ok_or_else(|| AskError::TagNotExist(id.to_string()))?;

    Ok(HttpResponse::Ok().json(TagView::new(tag, data.base_url())))
}

#[delete("/{id}/")]
async fn remove(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    secured::admin(&req, &data).await?;
    let id = path.into_inner();

    if !data.persistence().tag_delete(id).await? {
        return Err(AskError::TagNotExist(id.to_string()).into());
    }

    Ok(HttpResponse::NoContent().finish())
}

#[get("/{id}/questions/")]
async fn questions(
    data: web::Data<AppState>,
    path: web::Path<i32>,
    page: web::Query<PageParam>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    if data.persistence().tag_find_by_id(id).await?.is_none() {
        return Err(AskError::TagNotExist(id.to_string()).into());
    }

    let (page_no, page_size) = page.resolve();
    let filter = QuestionFilter {
        tag_id: Some(id),
        author_id: None,
    };
    let result = data
        .persistence()
        .question_find_page(filter, None, page_no, page_size)
        .await?;

    let base = data.base_url();
    Ok(HttpResponse::Ok().json(result.map(|q| QuestionView::new(q, base))))
}

pub fn routes() -> Scope {
    web::scope("/tags")
        .service(search)
        .service(create)
        .service(detail)
        .service(remove)
        .service(questions)
}
