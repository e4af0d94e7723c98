//! [`Logger`] backed by the `tracing` crate.

use puzzle_core::{LogLevel, Logger};

/// Forwards diagnostics to `tracing` under the `puzzle` target.
///
/// Nothing is printed unless the host installs a subscriber.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Info => tracing::info!(target: "puzzle", "{message}"),
            LogLevel::Warning => tracing::warn!(target: "puzzle", "{message}"),
            LogLevel::Error => tracing::error!(target: "puzzle", "{message}"),
        }
    }
}
