//! Authentication models
//!
//! Configuration keys, JWT claims and the per-request auth context

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use serde::{Deserialize, Serialize};

// Auth configuration keys
pub const TOKEN_SECRET_KEY: &str = "askme.auth.token.secret.key";
pub const TOKEN_EXPIRE_SECONDS: &str = "askme.auth.token.expire.seconds";
pub const DEFAULT_TOKEN_EXPIRE_SECONDS: i64 = 36000;
pub const BCRYPT_COST: &str = "askme.auth.bcrypt.cost";
pub const DEFAULT_BCRYPT_COST: u32 = 10;

pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const ACCESS_TOKEN: &str = "accessToken";
pub const TOKEN_PREFIX: &str = "Token ";
pub const BEARER_PREFIX: &str = "Bearer ";

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 72;
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Unable to log in with provided credentials.";

/// JWT claims. `jti` is the key of the token row that keeps the token alive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtPayload {
    pub sub: String,
    pub jti: String,
    pub exp: i64,
}

/// Freshly signed login token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    pub token: String,
    pub token_key: String,
    pub expiry: DateTime<Utc>,
}

/// Auth context passed through request extensions
#[derive(Debug, Default, Clone)]
pub struct AuthContext {
    pub username: String,
    pub token_key: String,
    pub token: String,
    pub jwt_error: Option<jsonwebtoken::errors::Error>,
    pub token_provided: bool,
}

impl AuthContext {
    pub fn jwt_error_string(&self) -> String {
        if let Some(e) = &self.jwt_error {
            match e.kind() {
                ErrorKind::ExpiredSignature => "token expired!".to_string(),
                _ => "Invalid token.".to_string(),
            }
        } else {
            String::default()
        }
    }

    /// A token was sent and it decoded cleanly
    pub fn is_authenticated(&self) -> bool {
        self.token_provided && self.jwt_error.is_none() && !self.username.is_empty()
    }
}
