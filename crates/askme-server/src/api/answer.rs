//! Answer endpoints

use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, patch, post, web};
use validator::Validate;

use askme_common::{AskError, LikeTarget};
use askme_persistence::AnswerInfo;

use crate::api::model::{AnswerView, PageParam};
use crate::api::question::AnswerForm;
use crate::error::AppError;
use crate::model::AppState;
use crate::secured;

async fn load_answer(data: &AppState, id: i32) -> Result<AnswerInfo, AppError> {
    data.persistence()
        .answer_find_by_id(id)
        .await?
        .ok_or_else(|| AskError::AnswerNotExist(id).into())
}

#[get("/")]
async fn search(
    data: web::Data<AppState>,
    page: web::Query<PageParam>,
) -> Result<HttpResponse, AppError> {
    let (page_no, page_size) = page.resolve();
    let result = data
        .persistence()
        .answer_find_page(None, page_no, page_size)
        .await?;

    let base = data.base_url();
    Ok(HttpResponse::Ok().json(result.map(|a| AnswerView::new(a, base))))
}

#[get("/{id}/")]
async fn detail(data: web::Data<AppState>, path: web::Path<i32>) -> Result<HttpResponse, AppError> {
    let answer = load_answer(&data, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(AnswerView::new(answer, data.base_url())))
}

#[patch("/{id}/")]
async fn update(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
    form: web::Json<AnswerForm>,
) -> Result<HttpResponse, AppError> {
    let principal = secured::authenticated(&req, &data).await?;
    let id = path.into_inner();
    let answer = load_answer(&data, id).await?;
    principal.ensure_owner_or_admin(answer.author_id)?;
    form.validate()?;

    let answer = data.persistence().answer_update_text(id, &form.text).await?;

    Ok(HttpResponse::Ok().json(AnswerView::new(answer, data.base_url())))
}

#[delete("/{id}/")]
async fn remove(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let principal = secured::authenticated(&req, &data).await?;
    let id = path.into_inner();
    let answer = load_answer(&data, id).await?;
    principal.ensure_owner_or_admin(answer.author_id)?;

    data.persistence().answer_delete(id).await?;

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
        .like_toggle(principal.id(), LikeTarget::Answer(id))
        .await?;
    let answer = load_answer(&data, id).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "liked": outcome.liked,
        "answer": AnswerView::new(answer, data.base_url()),
    })))
}

/// Only the author of the question (or staff) picks the right answer
#[post("/{id}/mark_as_right/")]
async fn mark_as_right(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let principal = secured::authenticated(&req, &data).await?;
    let id = path.into_inner();
    let answer = load_answer(&data, id).await?;

    let question = data
        .persistence()
        .question_find_by_id(answer.question_id)
        .await?
        .ok_or(AskError::QuestionNotExist(answer.question_id))?;
    principal.ensure_owner_or_admin(question.author_id)?;

    let answer = data.persistence().answer_mark_right(id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "is_right": answer.right_answer })))
}

pub fn routes() -> Scope {
    web::scope("/answers")
        .service(search)
        .service(detail)
        .service(update)
        .service(remove)
        .service(set_like)
        .service(mark_as_right)
}
