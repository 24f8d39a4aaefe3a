//! HTTP API of the question and answer service

pub mod answer;
pub mod model;
pub mod profile;
pub mod question;
pub mod root;
pub mod tag;
pub mod user;

use actix_web::web;

/// Register every API route on a scope or app
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(root::index)
        .service(user::routes())
        .service(profile::routes())
        .service(question::routes())
        .service(answer::routes())
        .service(tag::routes());
}
