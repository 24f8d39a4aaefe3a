use actix_web::{HttpRequest, HttpResponse, Scope, get, post, web};
use validator::Validate;

use askme_auth::model::{AUTHORIZATION_HEADER, IssuedToken, TOKEN_PREFIX};
use askme_auth::service::account;
use askme_persistence::UserInfo;

use crate::{
    api::model::{ProfileView, UserView},
    auth::model::{LoginForm, LoginResult, RegisterForm},
    error::AppError,
    model::AppState,
    secured,
};

fn login_response(
    mut builder: actix_web::HttpResponseBuilder,
    user: &UserInfo,
    issued: IssuedToken,
    base: &str,
) -> HttpResponse {
    builder
        .append_header((
            AUTHORIZATION_HEADER,
            format!("{}{}", TOKEN_PREFIX, issued.token),
        ))
        .json(LoginResult {
            user: UserView::new(user, base),
            token: issued.token,
            expiry: issued.expiry,
        })
}

#[post("/register/")]
async fn register(
    data: web::Data<AppState>,
    form: web::Json<RegisterForm>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    form.validate()?;

    let persistence = data.persistence();
    account::register(
        persistence,
        &form.username,
        form.email,
        &form.password,
        data.configuration.bcrypt_cost(),
    )
    .await?;

    let (user, issued) =
        account::login(persistence, &form.username, &form.password, data.token_settings()).await?;

    Ok(login_response(
        HttpResponse::Created(),
        &user,
        issued,
        data.base_url(),
    ))
}

#[post("/login/")]
async fn login(
    data: web::Data<AppState>,
    form: web::Json<LoginForm>,
) -> Result<HttpResponse, AppError> {
    form.validate()?;

    let (user, issued) = account::login(
        data.persistence(),
        &form.username,
        &form.password,
        data.token_settings(),
    )
    .await?;

    tracing::info!(user_id = user.id, "user logged in");

    Ok(login_response(HttpResponse::Ok(), &user, issued, data.base_url()))
}

#[post("/logout/")]
async fn logout(req: HttpRequest, data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let principal = secured::authenticated(&req, &data).await?;

    account::logout(data.persistence(), &principal.token, &principal.token_key).await?;

    Ok(HttpResponse::NoContent().finish())
}

#[post("/logoutall/")]
async fn logout_all(req: HttpRequest, data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let principal = secured::authenticated(&req, &data).await?;

    let revoked = account::logout_all(data.persistence(), principal.id()).await?;
    tracing::info!(user_id = principal.id(), revoked, "all tokens revoked");

    Ok(HttpResponse::NoContent().finish())
}

#[get("/user/")]
async fn current_user(req: HttpRequest, data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let principal = secured::authenticated(&req, &data).await?;

    Ok(HttpResponse::Ok().json(ProfileView::new(&principal.user, data.base_url())))
}

pub fn routes() -> Scope {
    web::scope("/auth")
        .service(register)
        .service(login)
        .service(logout)
        .service(logout_all)
        .service(current_user)
}
