//! Observability for the adapter: subscriber setup, redaction and timing.
//!
//! The library only emits `tracing` events and spans. Binaries decide where
//! they go by calling [`init_tracing`] once at startup.

mod logging;

pub use logging::{redact, truncate, LogConfig, LogLevel};

use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

use crate::errors::{AdapterError, AdapterResult};

/// Installs a global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `config.level`. Fails if a global
/// subscriber is already installed.
pub fn init_tracing(config: &LogConfig) -> AdapterResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_directive()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.include_targets);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| {
        AdapterError::configuration(format!("failed to install tracing subscriber: {}", e))
    })
}

/// Request timer for measuring operation duration.
pub struct RequestTimer {
    start: Instant,
    operation: &'static str,
}

impl RequestTimer {
    /// Starts a timer for an operation.
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    /// Returns the elapsed time.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Returns the operation name.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Logs the elapsed time at debug level.
    pub fn finish(self, success: bool) -> Duration {
        let elapsed = self.elapsed();
        tracing::debug!(
            operation = self.operation,
            success,
            elapsed_ms = elapsed.as_millis() as u64,
            "operation finished"
        );
        elapsed
    }
}

impl std::fmt::Debug for RequestTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestTimer")
            .field("operation", &self.operation)
            .field("elapsed", &self.elapsed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_timer_measures() {
        let timer = RequestTimer::start("chat.completions");
        std::thread::sleep(Duration::from_millis(5));

        assert_eq!(timer.operation(), "chat.completions");
        assert!(timer.finish(true) >= Duration::from_millis(5));
    }

    #[test]
    fn test_init_tracing_twice_fails() {
        let _ = init_tracing(&LogConfig::new().level(LogLevel::Off));
        let second = init_tracing(&LogConfig::new().level(LogLevel::Off));

        assert!(matches!(second, Err(AdapterError::Configuration { .. })));
    }
}
