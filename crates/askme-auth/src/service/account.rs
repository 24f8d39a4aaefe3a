//! Account flows: register, login, logout and token resolution

use askme_common::{AskError, is_valid_username};
use askme_persistence::{NewUser, PersistenceService, UserInfo};
use chrono::Utc;

use crate::model::{INVALID_CREDENTIALS_MESSAGE, IssuedToken};
use crate::service::{auth, password};

/// Token signing settings
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub secret_key: String,
    pub expire_seconds: i64,
}

/// Create an account. The password is validated and hashed here.
pub async fn register(
    persistence: &dyn PersistenceService,
    username: &str,
    email: Option<String>,
    raw_password: &str,
    bcrypt_cost: u32,
) -> anyhow::Result<UserInfo> {
    if !is_valid_username(username) {
        return Err(AskError::IllegalArgument(format!(
            "invalid username '{}': use letters, digits and @/./+/-/_ only",
            username
        ))
        .into());
    }
    password::validate_password(raw_password)?;

    let password_hash = password::hash_password(raw_password, bcrypt_cost)?;

    let user = persistence
        .user_create(NewUser {
            username: username.to_string(),
            email,
            password_hash,
            is_staff: false,
        })
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "user registered");

    Ok(user)
}

/// Check credentials and issue a token backed by a fresh token row
pub async fn login(
    persistence: &dyn PersistenceService,
    username: &str,
    raw_password: &str,
    settings: &TokenSettings,
) -> anyhow::Result<(UserInfo, IssuedToken)> {
    let user = match persistence.user_find_by_username(username).await? {
        Some(user) if user.is_active && password::verify_password(raw_password, &user.password) => {
            user
        }
        _ => {
            return Err(AskError::IllegalArgument(INVALID_CREDENTIALS_MESSAGE.to_string()).into());
        }
    };

    let issued = auth::encode_jwt_token(
        &user.username,
        &settings.secret_key,
        settings.expire_seconds,
    )?;

    persistence
        .token_create(user.id, &issued.token_key, issued.expiry)
        .await?;

    Ok((user, issued))
}

/// Resolve the user behind a decoded token, if its row is still alive
pub async fn resolve_user(
    persistence: &dyn PersistenceService,
    username: &str,
    token_key: &str,
) -> anyhow::Result<Option<UserInfo>> {
    let Some(token) = persistence.token_find_valid(token_key, Utc::now()).await? else {
        return Ok(None);
    };

    let user = persistence
        .user_find_by_id(token.user_id)
        .await?
        .filter(|user| user.is_active && user.username == username);

    Ok(user)
}

/// Revoke one token
pub async fn logout(
    persistence: &dyn PersistenceService,
    token: &str,
    token_key: &str,
) -> anyhow::Result<()> {
    persistence.token_delete(token_key).await?;
    auth::invalidate_token(token);
    Ok(())
}

/// Revoke every token of a user
pub async fn logout_all(persistence: &dyn PersistenceService, user_id: i32) -> anyhow::Result<u64> {
    let keys = persistence.token_delete_by_user(user_id).await?;
    auth::invalidate_token_keys(&keys);
    Ok(keys.len() as u64)
}
