//! Question endpoints, including nested answers, tags and likes

use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, patch, post, put, web};
use serde::Deserialize;
use validator::Validate;

use askme_common::{AskError, LikeTarget, TITLE_MAX_LENGTH, is_valid_tag_name};
use askme_persistence::{NewQuestion, QuestionFilter, QuestionSort, QuestionUpdate};

use crate::api::model::{AnswerView, PageParam, QuestionView, TagView};
use crate::error::AppError;
use crate::model::AppState;
use crate::secured;

#[derive(Debug, Deserialize)]
struct SearchParam {
    sort: Option<String>,
    tag: Option<i32>,
    author: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuestionForm {
    #[validate(length(min = 1, max = TITLE_MAX_LENGTH))]
    title: String,
    #[validate(length(min = 1))]
    long_text: String,
    tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuestionPatch {
    #[validate(length(min = 1, max = TITLE_MAX_LENGTH))]
    title: Option<String>,
    #[validate(length(min = 1))]
    long_text: Option<String>,
    tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AnswerForm {
    #[validate(length(min = 1))]
    pub(crate) text: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagForm {
    pub(crate) name: String,
}

/// Reject tag names that are not a single short word
pub(crate) fn check_tag_names(names: &[String]) -> Result<(), AskError> {
    match names.iter().find(|name| !is_valid_tag_name(name)) {
        Some(name) => Err(AskError::IllegalArgument(format!(
            "invalid tag '{}': a tag is one word of at most 20 characters",
            name
        ))),
        None => Ok(()),
    }
}

async fn load_question(
    data: &AppState,
    id: i32,
) -> Result<askme_persistence::QuestionInfo, AppError> {
    data.persistence()
        .question_find_by_id(id)
        .await?
        .ok_or_else(|| AskError::QuestionNotExist(id).into())
}

#[get("/")]
async fn search(
    data: web::Data<AppState>,
    page: web::Query<PageParam>,
    params: web::Query<SearchParam>,
) -> Result<HttpResponse, AppError> {
    let (page_no, page_size) = page.resolve();
    let sort = params
        .sort
        .as_deref()
        .map(str::parse::<QuestionSort>)
        .transpose()?;
    let filter = QuestionFilter {
        tag_id: params.tag,
        author_id: params.author,
    };

    let result = data
        .persistence()
        .question_find_page(filter, sort, page_no, page_size)
        .await?;

    let base = data.base_url();
    Ok(HttpResponse::Ok().json(result.map(|q| QuestionView::new(q, base))))
}

#[post("/")]
async fn create(
    req: HttpRequest,
    data: web::Data<AppState>,
    form: web::Json<QuestionForm>,
) -> Result<HttpResponse, AppError> {
    let principal = secured::authenticated(&req, &data).await?;

    let form = form.into_inner();
    form.validate()?;
    let tag_names = form.tags.unwrap_or_default();
    check_tag_names(&tag_names)?;

    let question = data
        .persistence()
        .question_create(
            principal.id(),
            NewQuestion {
                title: form.title,
                long_text: form.long_text,
                tags: tag_names,
            },
        )
        .await?;

    tracing::info!(question_id = question.id, author_id = principal.id(), "question created");

    Ok(HttpResponse::Created().json(QuestionView::new(question, data.base_url())))
}

#[get("/{id}/")]
async fn detail(data: web::Data<AppState>, path: web::Path<i32>) -> Result<HttpResponse, AppError> {
    let question = load_question(&data, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(QuestionView::new(question, data.base_url())))
}

async fn apply_update(
    req: &HttpRequest,
    data: &web::Data<AppState>,
    id: i32,
    changes: QuestionUpdate,
) -> Result<HttpResponse, AppError> {
    let principal = secured::authenticated(req, data).await?;
    let question = load_question(data, id).await?;
    principal.ensure_owner_or_admin(question.author_id)?;

    if let Some(tag_names) = &changes.tags {
        check_tag_names(tag_names)?;
    }

    let question = data.persistence().question_update(id, changes).await?;

    Ok(HttpResponse::Ok().json(QuestionView::new(question, data.base_url())))
}

#[put("/{id}/")]
async fn replace(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
    form: web::Json<QuestionForm>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    form.validate()?;

    let changes = QuestionUpdate {
        title: Some(form.title),
        long_text: Some(form.long_text),
        tags: form.tags,
    };

    apply_update(&req, &data, path.into_inner(), changes).await
}

#[patch("/{id}/")]
async fn update(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
    form: web::Json<QuestionPatch>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    form.validate()?;

    let changes = QuestionUpdate {
        title: form.title,
        long_text: form.long_text,
        tags: form.tags,
    };

    apply_update(&req, &data, path.into_inner(), changes).await
}

#[delete("/{id}/")]
async fn remove(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let principal = secured::authenticated(&req, &data).await?;
    let id = path.into_inner();
    let question = load_question(&data, id).await?;
    principal.ensure_owner_or_admin(question.author_id)?;

    data.persistence().question_delete(id).await?;

    tracing::info!(question_id = id, user_id = principal.id(), "question deleted");

    Ok(HttpResponse::NoContent().finish())
}

#[post("/{id}/set_like/")]
async fn set_like(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let principal = secured::authenticated(&req, &data).await?;
    let id = path.into_inner();

    let outcome = data
        .persistence()
        .like_toggle(principal.id(), LikeTarget::Question(id))
        .await?;
    let question = load_question(&data, id).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "liked": outcome.liked,
        "question": QuestionView::new(question, data.base_url()),
    })))
}

#[get("/{id}/answers/")]
async fn answers(
    data: web::Data<AppState>,
    path: web::Path<i32>,
    page: web::Query<PageParam>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    load_question(&data, id).await?;

    let (page_no, page_size) = page.resolve();
    let result = data
        .persistence()
        .answer_find_page(Some(id), page_no, page_size)
        .await?;

    let base = data.base_url();
    Ok(HttpResponse::Ok().json(result.map(|a| AnswerView::new(a, base))))
}

#[post("/{id}/answers/")]
async fn answer(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
    form: web::Json<AnswerForm>,
) -> Result<HttpResponse, AppError> {
    let principal = secured::authenticated(&req, &data).await?;
    form.validate()?;

    let created = data
        .persistence()
        .answer_create(path.into_inner(), principal.id(), &form.text)
        .await?;

    Ok(HttpResponse::Created().json(AnswerView::new(created, data.base_url())))
}

#[get("/{id}/tags/")]
async fn tags(data: web::Data<AppState>, path: web::Path<i32>) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    load_question(&data, id).await?;

    let base = data.base_url();
    let items: Vec<TagView> = data
        .persistence()
        .tag_find_by_question(id)
        .await?
        .into_iter()
        .map(|t| TagView::new(t, base))
        .collect();

    Ok(HttpResponse::Ok().json(items))
}

#[post("/{id}/tags/")]
async fn add_tag(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
    form: web::Json<TagForm>,
) -> Result<HttpResponse, AppError> {
    let principal = secured::authenticated(&req, &data).await?;
    let id = path.into_inner();
    let question = load_question(&data, id).await?;
    principal.ensure_owner_or_admin(question.author_id)?;

    check_tag_names(std::slice::from_ref(&form.name))?;

    let tag = data.persistence().question_add_tag(id, &form.name).await?;

    Ok(HttpResponse::Created().json(TagView::new(tag, data.base_url())))
}

pub fn routes() -> Scope {
    web::scope("/questions")
        .service(search)
        .service(create)
        .service(detail)
        .service(replace)
        .service(update)
        .service(remove)
        .service(set_like)
        .service(answers)
        .service(answer)
        .service(tags)
        .service(add_tag)
}
