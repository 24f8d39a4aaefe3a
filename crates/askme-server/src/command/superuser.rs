use askme_auth::service::password;
use askme_common::{AskError, is_valid_username};
use askme_persistence::{NewUser, PersistenceService, UserInfo};

/// Create a staff account from the command line
pub async fn create_superuser(
    persistence: &dyn PersistenceService,
    username: &str,
    raw_password: &str,
    email: Option<String>,
    bcrypt_cost: u32,
) -> anyhow::Result<UserInfo> {
    if !is_valid_username(username) {
        return Err(AskError::IllegalArgument(format!("invalid username '{}'", username)).into());
    }
    password::validate_password(raw_password)?;

    let user = persistence
        .user_create(NewUser {
            username: username.to_string(),
            email,
            password_hash: password::hash_password(raw_password, bcrypt_cost)?,
            is_staff: true,
        })
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "superuser created");

    Ok(user)
}
