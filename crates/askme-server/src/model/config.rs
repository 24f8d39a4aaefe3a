//! Configuration management for AskMe server
//!
//! Values come from `conf/application.yml`, then `askme`-prefixed
//! environment variables, then command line flags.

use std::time::Duration;

use clap::{Parser, Subcommand};
use config::{Config, Environment};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use askme_auth::model::{
    BCRYPT_COST, DEFAULT_BCRYPT_COST, DEFAULT_TOKEN_EXPIRE_SECONDS, TOKEN_EXPIRE_SECONDS,
    TOKEN_SECRET_KEY,
};
use askme_common::AskError;

use super::constants::{
    DB_MIGRATE_ON_STARTUP, DB_URL, DEFAULT_CONFIG_FILE, DEFAULT_LOGS_LEVEL,
    DEFAULT_RATING_TOP_LIMIT, DEFAULT_SERVER_ADDRESS, DEFAULT_SERVER_PORT, ENV_PREFIX, LOGS_LEVEL,
    LOGS_PATH, RATING_TOP_LIMIT, SERVER_ADDRESS, SERVER_CONTEXT_PATH, SERVER_PORT,
};

/// Command line arguments for the server
#[derive(Debug, Parser)]
#[command(name = "askme-server", version, about = "AskMe question and answer server")]
pub struct Cli {
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_FILE, global = true)]
    pub config_file: String,
    #[arg(long = "db-url", env = "DATABASE_URL", global = true)]
    pub database_url: Option<String>,
    #[arg(short = 'p', long = "port", global = true)]
    pub port: Option<u16>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Apply pending database migrations
    Migrate,
    /// Create an administrator account
    CreateSuperuser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// Fill the database with random users, questions, answers and likes
    GenerateData {
        #[arg(long, default_value_t = 10)]
        users: u32,
        #[arg(long, default_value_t = 10)]
        tags: u32,
        #[arg(long, default_value_t = 20)]
        questions: u32,
        #[arg(long, default_value_t = 50)]
        answers: u32,
        #[arg(long, default_value_t = 100)]
        likes: u32,
    },
}

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    pub fn new(cli: &Cli) -> anyhow::Result<Self> {
        let mut config_builder = Config::builder()
            .add_source(config::File::with_name(&cli.config_file).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator(".")
                    .try_parsing(true),
            );

        if let Some(v) = &cli.database_url {
            config_builder = config_builder.set_override(DB_URL, v.as_str())?;
        }
        if let Some(v) = cli.port {
            config_builder = config_builder.set_override(SERVER_PORT, v as i64)?;
        }

        let app_config = config_builder.build().map_err(|e| {
            AskError::ConfigError(format!("{} - check {}", e, cli.config_file))
        })?;

        Ok(Configuration { config: app_config })
    }

    pub fn from_config(config: Config) -> Self {
        Configuration { config }
    }

    pub fn server_address(&self) -> String {
        self.config
            .get_string(SERVER_ADDRESS)
            .unwrap_or(DEFAULT_SERVER_ADDRESS.to_string())
    }

    pub fn server_port(&self) -> u16 {
        self.config
            .get_int(SERVER_PORT)
            .unwrap_or(DEFAULT_SERVER_PORT.into()) as u16
    }

    /// Context path without surrounding slashes; empty means the root
    pub fn server_context_path(&self) -> String {
        self.config
            .get_string(SERVER_CONTEXT_PATH)
            .unwrap_or_default()
            .trim_matches('/')
            .to_string()
    }

    /// Scope prefix for actix: `""` or `"/<context>"`
    pub fn server_scope(&self) -> String {
        let context_path = self.server_context_path();
        if context_path.is_empty() {
            String::new()
        } else {
            format!("/{}", context_path)
        }
    }

    /// Prefix of every URL rendered in response bodies, always ending in `/`
    pub fn base_url(&self) -> String {
        format!("{}/", self.server_scope())
    }

    pub fn migrate_on_startup(&self) -> bool {
        self.config.get_bool(DB_MIGRATE_ON_STARTUP).unwrap_or(false)
    }

    pub fn token_secret_key(&self) -> Option<String> {
        self.config
            .get_string(TOKEN_SECRET_KEY)
            .ok()
            .filter(|v| !v.trim().is_empty())
    }

    pub fn token_expire_seconds(&self) -> i64 {
        self.config
            .get_int(TOKEN_EXPIRE_SECONDS)
            .unwrap_or(DEFAULT_TOKEN_EXPIRE_SECONDS)
    }

    /// bcrypt work factor, kept inside the range bcrypt accepts
    pub fn bcrypt_cost(&self) -> u32 {
        self.config
            .get_int(BCRYPT_COST)
            .unwrap_or(DEFAULT_BCRYPT_COST.into())
            .clamp(4, 31) as u32
    }

    pub fn rating_top_limit(&self) -> u64 {
        self.config
            .get_int(RATING_TOP_LIMIT)
            .ok()
            .filter(|v| *v > 0)
            .map(|v| v as u64)
            .unwrap_or(DEFAULT_RATING_TOP_LIMIT)
    }

    pub fn log_level(&self) -> String {
        self.config
            .get_string(LOGS_LEVEL)
            .unwrap_or(DEFAULT_LOGS_LEVEL.to_string())
    }

    pub fn log_path(&self) -> Option<String> {
        self.config
            .get_string(LOGS_PATH)
            .ok()
            .filter(|v| !v.trim().is_empty())
    }

    pub async fn database_connection(&self) -> anyhow::Result<DatabaseConnection> {
        let max_connections = self
            .config
            .get_int("db.pool.config.maximumPoolSize")
            .unwrap_or(10) as u32;
        let min_connections = self
            .config
            .get_int("db.pool.config.minimumPoolSize")
            .unwrap_or(1) as u32;
        let connect_timeout = self
            .config
            .get_int("db.pool.config.connectionTimeout")
            .unwrap_or(30) as u64;
        let acquire_timeout = self
            .config
            .get_int("db.pool.config.initializationFailTimeout")
            .unwrap_or(8) as u64;
        let idle_timeout = self
            .config
            .get_int("db.pool.config.idleTimeout")
            .unwrap_or(10) as u64;
        let max_lifetime = self
            .config
            .get_int("db.pool.config.maxLifetime")
            .unwrap_or(1800) as u64;
        let sqlx_logging = self
            .config
            .get_bool("db.pool.config.sqlxLogging")
            .unwrap_or(false);

        let url = self
            .config
            .get_string(DB_URL)
            .map_err(|_| AskError::ConfigError(format!("'{}' is not set", DB_URL)))?;

        let mut opt = ConnectOptions::new(url);

        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(connect_timeout))
            .acquire_timeout(Duration::from_secs(acquire_timeout))
            .idle_timeout(Duration::from_secs(idle_timeout))
            .max_lifetime(Duration::from_secs(max_lifetime))
            .sqlx_logging(sqlx_logging);

        let db = Database::connect(opt).await?;

        Ok(db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configuration(pairs: &[(&str, &str)]) -> Configuration {
        let mut builder = Config::builder();
        for (key, value) in pairs {
            builder = builder.set_override(*key, *value).unwrap();
        }
        Configuration::from_config(builder.build().unwrap())
    }

    #[test]
    fn test_defaults() {
        let configuration = configuration(&[]);
        assert_eq!(configuration.server_address(), "0.0.0.0");
        assert_eq!(configuration.server_port(), 8000);
        assert_eq!(configuration.server_scope(), "");
        assert_eq!(configuration.base_url(), "/");
        assert_eq!(configuration.token_expire_seconds(), 36000);
        assert_eq!(configuration.bcrypt_cost(), 10);
        assert_eq!(configuration.rating_top_limit(), 10);
        assert!(configuration.token_secret_key().is_none());
        assert!(configuration.log_path().is_none());
        assert!(!configuration.migrate_on_startup());
    }

    #[test]
    fn test_context_path_is_normalized() {
        let configuration = configuration(&[(SERVER_CONTEXT_PATH, "/askme/")]);
        assert_eq!(configuration.server_context_path(), "askme");
        assert_eq!(configuration.server_scope(), "/askme");
        assert_eq!(configuration.base_url(), "/askme/");
    }

    #[test]
    fn test_overrides_are_parsed() {
        let configuration = configuration(&[
            (SERVER_PORT, "9090"),
            (BCRYPT_COST, "2"),
            (RATING_TOP_LIMIT, "0"),
            (TOKEN_SECRET_KEY, "  "),
        ]);
        assert_eq!(configuration.server_port(), 9090);
        assert_eq!(configuration.bcrypt_cost(), 4);
        assert_eq!(configuration.rating_top_limit(), 10);
        assert!(configuration.token_secret_key().is_none());
    }

    #[test]
    fn test_cli_subcommands() {
        let cli = Cli::parse_from([
            "askme-server",
            "create-superuser",
            "--username",
            "root",
            "--password",
            "change-me-now",
        ]);
        assert!(matches!(
            cli.command,
            Some(Command::CreateSuperuser { ref username, .. }) if username == "root"
        ));

        let cli = Cli::parse_from(["askme-server", "--port", "9000"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.port, Some(9000));
    }
}
