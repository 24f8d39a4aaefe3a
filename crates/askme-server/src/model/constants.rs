//! Configuration keys and their defaults

pub const SERVER_ADDRESS: &str = "server.address";
pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0";
pub const SERVER_PORT: &str = "server.port";
pub const DEFAULT_SERVER_PORT: u16 = 8000;
pub const SERVER_CONTEXT_PATH: &str = "askme.server.contextPath";

pub const DB_URL: &str = "db.url";
pub const DB_MIGRATE_ON_STARTUP: &str = "askme.db.migrateOnStartup";

pub const RATING_TOP_LIMIT: &str = "askme.rating.top.limit";
pub const DEFAULT_RATING_TOP_LIMIT: u64 = 10;

pub const LOGS_LEVEL: &str = "askme.logs.level";
pub const DEFAULT_LOGS_LEVEL: &str = "info";
pub const LOGS_PATH: &str = "askme.logs.path";

pub const APP_NAME: &str = "askme";
pub const ENV_PREFIX: &str = "askme";
pub const DEFAULT_CONFIG_FILE: &str = "conf/application.yml";
