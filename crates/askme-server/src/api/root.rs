//! API root listing the entry points

use std::collections::BTreeMap;

use actix_web::{HttpResponse, Responder, get, web};

use crate::model::AppState;

#[get("/")]
pub async fn index(data: web::Data<AppState>) -> impl Responder {
    let base = data.base_url();

    let entries: BTreeMap<&str, String> = [
        "users",
        "profiles",
        "questions",
        "answers",
        "tags",
    ]
    .into_iter()
    .map(|name| (name, format!("{}{}/", base, name)))
    .collect();

    HttpResponse::Ok().json(entries)
}
