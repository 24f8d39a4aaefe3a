//! User administration endpoints and the nested profile routes

use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, patch, web};

use askme_common::AskError;

use crate::api::model::{PageParam, ProfileView, UserView};
use crate::api::profile::{ProfilePatch, owned_profile, patch_profile};
use crate::error::AppError;
use crate::model::AppState;
use crate::secured;

#[get("/")]
async fn search(
    req: HttpRequest,
    data: web::Data<AppState>,
    page: web::Query<PageParam>,
) -> Result<HttpResponse, AppError> {
    secured::admin(&req, &data).await?;

    let (page_no, page_size) = page.resolve();
    let result = data.persistence().user_find_page(page_no, page_size).await?;

    let base = data.base_url();
    Ok(HttpResponse::Ok().json(result.map(|u| UserView::new(&u, base))))
}

#[get("/{id}/")]
async fn detail(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    secured::admin(&req, &data).await?;
    let id = path.into_inner();

    let user = data
        .persistence()
        .user_find_by_id(id)
        .await?
        .ok_or_else(|| AskError::UserNotExist(id.to_string()))?;

    Ok(HttpResponse::Ok().json(UserView::new(&user, data.base_url())))
}

#[delete("/{id}/")]
async fn remove(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let principal = secured::admin(&req, &data).await?;
    let id = path.into_inner();

    let revoked = data
        .persistence()
        .user_delete(id)
        .await?
        .ok_or_else(|| AskError::UserNotExist(id.to_string()))?;

    // token rows went with the user; drop their cached decodes too
    askme_auth::service::auth::invalidate_token_keys(&revoked);

    tracing::info!(user_id = id, by = principal.id(), "user deleted");

    Ok(HttpResponse::NoContent().finish())
}

#[get("/{user_id}/profile/")]
async fn profile(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let principal = secured::authenticated(&req, &data).await?;
    let user = owned_profile(&principal, &data, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ProfileView::new(&user, data.base_url())))
}

fn same_profile(user_id: i32, id: i32) -> Result<(), AskError> {
    if user_id == id {
        Ok(())
    } else {
        Err(AskError::UserNotExist(id.to_string()))
    }
}

#[get("/{user_id}/profile/{id}/")]
async fn profile_detail(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<(i32, i32)>,
) -> Result<HttpResponse, AppError> {
    let principal = secured::authenticated(&req, &data).await?;
    let (user_id, id) = path.into_inner();
    same_profile(user_id, id)?;

    let user = owned_profile(&principal, &data, id).await?;

    Ok(HttpResponse::Ok().json(ProfileView::new(&user, data.base_url())))
}

#[patch("/{user_id}/profile/{id}/")]
async fn profile_update(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<(i32, i32)>,
    form: web::Json<ProfilePatch>,
) -> Result<HttpResponse, AppError> {
    let principal = secured::authenticated(&req, &data).await?;
    let (user_id, id) = path.into_inner();
    same_profile(user_id, id)?;

    patch_profile(&principal, &data, id, form.into_inner()).await
}

pub fn routes() -> Scope {
    web::scope("/users")
        .service(search)
        .service(detail)
        .service(remove)
        .service(profile)
        .service(profile_detail)
        .service(profile_update)
}
