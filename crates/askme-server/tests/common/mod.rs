//! Shared setup for the HTTP integration tests

#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test,
};
use serde_json::{Value, json};

use askme_auth::model::{BCRYPT_COST, TOKEN_SECRET_KEY};
use askme_migration::{Migrator, MigratorTrait};
use askme_persistence::ExternalDbPersistService;
use askme_persistence::sea_orm::{ConnectOptions, Database};
use askme_server::model::{AppState, Configuration};

pub const PASSWORD: &str = "s3cret-password";
const TEST_SECRET: &str = "YXNrbWUtaW50ZWdyYXRpb24tdGVzdC1zZWNyZXQtMzJi";

/// Build the full application around `$state`
macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(askme_server::middleware::auth::Authentication)
                .app_data(actix_web::web::Data::from($state.clone()))
                .configure(askme_server::startup::configure_app(String::new())),
        )
        .await
    };
}

pub async fn app_state() -> Arc<AppState> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let config = config::Config::builder()
        .set_override(TOKEN_SECRET_KEY, TEST_SECRET)
        .unwrap()
        .set_override(BCRYPT_COST, 4)
        .unwrap()
        .build()
        .unwrap();

    Arc::new(AppState::new(
        Configuration::from_config(config),
        Arc::new(ExternalDbPersistService::new(db)),
    ))
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Token {}", token))
}

pub async fn send<S, B>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}

/// Register a user and return its id and token
pub async fn register<S, B>(app: &S, username: &str) -> (i32, String)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/auth/register/")
        .set_json(json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": PASSWORD,
        }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    (
        body["user"]["id"].as_i64().unwrap() as i32,
        body["token"].as_str().unwrap().to_string(),
    )
}

/// Create a staff account directly and log it in
pub async fn admin<S, B>(app: &S, state: &AppState, username: &str) -> (i32, String)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let user =
        askme_server::command::create_superuser(state.persistence(), username, PASSWORD, None, 4)
            .await
            .unwrap();

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_json(json!({ "username": username, "password": PASSWORD }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::OK);

    (user.id, body["token"].as_str().unwrap().to_string())
}

/// Post a question and return its id
pub async fn ask<S, B>(app: &S, token: &str, title: &str, tags: &[&str]) -> i32
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/questions/")
        .insert_header(bearer(token))
        .set_json(json!({
            "title": title,
            "long_text": format!("{} in more detail", title),
            "tags": tags,
        }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    body["id"].as_i64().unwrap() as i32
}

/// Answer a question and return the answer id
pub async fn answer<S, B>(app: &S, token: &str, question_id: i32, text: &str) -> i32
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri(&format!("/questions/{}/answers/", question_id))
        .insert_header(bearer(token))
        .set_json(json!({ "text": text }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    body["id"].as_i64().unwrap() as i32
}
