//! # Logging
//!
//! Installs a `tracing` subscriber for hosts that do not bring their own.

use prt_api::LogLevel;
use tracing_subscriber::EnvFilter;

/// Maps an engine log level to a `tracing` filter directive.
pub fn filter_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warning => "warn",
        LogLevel::Error | LogLevel::Fatal => "error",
        LogLevel::None => "off",
    }
}

/// Installs a formatting subscriber at `level`; `RUST_LOG` takes
/// precedence. Returns false if a global subscriber was already set.
pub fn init_logging(level: LogLevel) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
