//! Profile endpoints
//!
//! A profile shares its id with the user it belongs to.

use actix_web::{HttpRequest, HttpResponse, Scope, get, patch, web};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use askme_common::AskError;
use askme_persistence::{ProfileUpdate, UserInfo, UserSort};

use crate::api::model::{PageParam, ProfileView, TopParam};
use crate::error::AppError;
use crate::model::AppState;
use crate::secured::{self, Principal};

const AVATAR_MAX_LENGTH: u64 = 512;

#[derive(Debug, Default, Deserialize, Validate)]
pub(crate) struct ProfilePatch {
    #[validate(email)]
    pub(crate) email: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[validate(custom(function = "validate_avatar"))]
    pub(crate) avatar: Option<Option<String>>,
}

/// Runs only on a present avatar; `null` clears it
fn validate_avatar(url: &str) -> Result<(), ValidationError> {
    if url.chars().count() as u64 > AVATAR_MAX_LENGTH {
        return Err(ValidationError::new("avatar_too_long"));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ValidationError::new("avatar_not_http_url"));
    }

    Ok(())
}

impl From<ProfilePatch> for ProfileUpdate {
    fn from(value: ProfilePatch) -> Self {
        ProfileUpdate {
            email: value.email,
            avatar: value.avatar,
        }
    }
}

/// Load a profile the principal may see or change
pub(crate) async fn owned_profile(
    principal: &Principal,
    data: &AppState,
    id: i32,
) -> Result<UserInfo, AppError> {
    principal.ensure_owner_or_admin(id)?;

    if principal.id() == id {
        return Ok(principal.user.clone());
    }

    data.persistence()
        .user_find_by_id(id)
        .await?
        .ok_or_else(|| AskError::UserNotExist(id.to_string()).into())
}

/// Apply a validated patch to a profile the principal owns
pub(crate) async fn patch_profile(
    principal: &Principal,
    data: &AppState,
    id: i32,
    patch: ProfilePatch,
) -> Result<HttpResponse, AppError> {
    owned_profile(principal, data, id).await?;
    patch.validate()?;

    let user = data
        .persistence()
        .user_update_profile(id, patch.into())
        .await?;

    Ok(HttpResponse::Ok().json(ProfileView::new(&user, data.base_url())))
}

/// Public top profiles when `sort` and `limit` are given, otherwise the
/// staff-only full listing
#[get("/")]
async fn search(
    req: HttpRequest,
    data: web::Data<AppState>,
    page: web::Query<PageParam>,
    top: web::Query<TopParam>,
) -> Result<HttpResponse, AppError> {
    let base = data.base_url();

    if top.requested() {
        let sort = top
            .sort
            .as_deref()
            .map(str::parse::<UserSort>)
            .transpose()?
            .unwrap_or(UserSort::Rating);
        let limit = top.limit_or(data.configuration.rating_top_limit());

        let profiles: Vec<ProfileView> = data
            .persistence()
            .user_top(sort, limit)
            .await?
            .iter()
            .map(|u| ProfileView::public(u, base))
            .collect();

        return Ok(HttpResponse::Ok().json(profiles));
    }

    secured::admin(&req, &data).await?;

    let (page_no, page_size) = page.resolve();
    let result = data.persistence().user_find_page(page_no, page_size).await?;

    Ok(HttpResponse::Ok().json(result.map(|u| ProfileView::new(&u, base))))
}

#[get("/{id}/")]
async fn detail(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let principal = secured::authenticated(&req, &data).await?;
    let user = owned_profile(&principal, &data, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ProfileView::new(&user, data.base_url())))
}

#[patch("/{id}/")]
async fn update(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
    form: web::Json<ProfilePatch>,
) -> Result<HttpResponse, AppError> {
    let principal = secured::authenticated(&req, &data).await?;

    patch_profile(&principal, &data, path.into_inner(), form.into_inner()).await
}

pub fn routes() -> Scope {
    web::scope("/profiles")
        .service(search)
        .service(detail)
        .service(update)
}
