//! Application state shared across all handlers

use std::sync::Arc;

use askme_auth::service::{account::TokenSettings, auth::generate_secret_key};
use askme_persistence::PersistenceService;

use super::config::Configuration;

pub struct AppState {
    pub configuration: Configuration,
    pub persistence: Arc<dyn PersistenceService>,
    token_settings: TokenSettings,
    base_url: String,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("configuration", &self.configuration)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Build the state, generating a signing secret when none is configured.
    /// Tokens signed with a generated secret do not survive a restart.
    pub fn new(configuration: Configuration, persistence: Arc<dyn PersistenceService>) -> Self {
        let secret_key = match configuration.token_secret_key() {
            Some(key) => key,
            None => {
                tracing::warn!(
                    "{} is not configured, using a random secret; tokens will not survive a restart",
                    askme_auth::model::TOKEN_SECRET_KEY
                );
                generate_secret_key()
            }
        };

        let token_settings = TokenSettings {
            secret_key,
            expire_seconds: configuration.token_expire_seconds(),
        };
        let base_url = configuration.base_url();

        Self {
            configuration,
            persistence,
            token_settings,
            base_url,
        }
    }

    pub fn persistence(&self) -> &dyn PersistenceService {
        self.persistence.as_ref()
    }

    pub fn token_settings(&self) -> &TokenSettings {
        &self.token_settings
    }

    pub fn token_secret_key(&self) -> &str {
        &self.token_settings.secret_key
    }

    /// Prefix for URLs rendered in response bodies
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
