//! Application startup: logging, HTTP server and shutdown handling

mod http;
mod logging;
mod shutdown;

pub use http::{api_server, configure_app};
pub use logging::{LoggingConfig, LoggingGuard, get_subscriber, init_logging, init_subscriber};
pub use shutdown::{ShutdownSignal, stop_on_signal, wait_for_shutdown_signal};
