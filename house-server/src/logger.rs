//! Logging Infrastructure
//!
//! Structured logging setup shared by the binary and integration tests.

use tracing_subscriber::EnvFilter;

/// Initialize the logger with an env-filter (`RUST_LOG` override).
pub fn init_logger() {
    init_logger_with_level(None);
}

/// Initialize the logger with an explicit default level.
pub fn init_logger_with_level(level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or("info")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .try_init();
}
