//! Request and response bodies of the account endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use askme_common::USERNAME_MAX_LENGTH;

use crate::api::model::UserView;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1, max = USERNAME_MAX_LENGTH))]
    pub username: String,
    #[validate(email)]
    pub email: Option<String>,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Body returned by register and login
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResult {
    pub user: UserView,
    pub token: String,
    pub expiry: DateTime<Utc>,
}
