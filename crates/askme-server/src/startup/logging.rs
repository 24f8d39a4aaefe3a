//! Logging setup
//!
//! Events are written as bunyan JSON lines to stdout. When `askme.logs.path`
//! is set, the same stream also goes to a daily rolling `askme.log` in that
//! directory. `RUST_LOG` overrides the configured level.

use std::path::PathBuf;

use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const LOG_FILE_NAME: &str = "askme.log";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub name: String,
    pub level: String,
    /// Directory of the rolling log file; no file logging when absent
    pub log_dir: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn new(name: &str, level: String, log_dir: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            level,
            log_dir: log_dir
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }
}

/// Keeps the non-blocking file writer flushing until dropped
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Bunyan JSON subscriber writing to `sink`
pub fn get_subscriber(
    name: &str,
    env_filter: &str,
    sink: impl for<'a> MakeWriter<'a> + 'static + Send + Sync,
) -> impl Subscriber + Send + Sync {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));
    let formatting_layer = BunyanFormattingLayer::new(name.into(), sink);

    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
}

/// Install a subscriber globally and route `log` records into it
pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) -> anyhow::Result<()> {
    LogTracer::init()?;
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Install the process-wide subscriber described by `config`
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<LoggingGuard> {
    let Some(log_dir) = &config.log_dir else {
        init_subscriber(get_subscriber(&config.name, &config.level, std::io::stdout))?;
        return Ok(LoggingGuard { _file_guard: None });
    };

    std::fs::create_dir_all(log_dir)?;

    let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_NAME);
    let (file_writer, file_guard) = tracing_appender::non_blocking(appender);

    let layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = vec![
        Box::new(JsonStorageLayer),
        Box::new(
            BunyanFormattingLayer::new(config.name.clone(), std::io::stdout)
                .with_filter(config.env_filter()),
        ),
        Box::new(
            BunyanFormattingLayer::new(config.name.clone(), file_writer)
                .with_filter(config.env_filter()),
        ),
    ];

    init_subscriber(Registry::default().with(layers))?;

    tracing::info!(log_dir = %log_dir.display(), "file logging enabled");

    Ok(LoggingGuard {
        _file_guard: Some(file_guard),
    })
}
