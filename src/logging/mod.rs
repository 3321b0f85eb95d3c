// Logging setup - tracing subscriber for console and optional rolling files
//
// Precedence for the filter: RUST_LOG env var > config file > default "info".
// File logging writes JSON lines through a non-blocking writer; the returned
// guard must stay alive until exit so buffered lines are flushed.

use crate::config::{LogRotation, LoggingConfig};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive used when RUST_LOG is not set
pub fn default_directive(config: &LoggingConfig) -> String {
    format!("sitefx={}", config.level)
}

/// Rolling file appender for the configured rotation
fn file_appender(config: &LoggingConfig) -> tracing_appender::rolling::RollingFileAppender {
    let dir = &config.file_dir;
    let prefix = &config.file_prefix;
    match config.file_rotation {
        LogRotation::Hourly => tracing_appender::rolling::hourly(dir, prefix),
        LogRotation::Daily => tracing_appender::rolling::daily(dir, prefix),
        LogRotation::Never => tracing_appender::rolling::never(dir, prefix),
    }
}

/// Install the global subscriber. Call once, early in `main`.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive(config).into());

    if !config.file_enabled {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
        return None;
    }

    if let Err(e) = std::fs::create_dir_all(&config.file_dir) {
        eprintln!(
            "Warning: Could not create log directory {:?}: {}",
            config.file_dir, e
        );
        // Console only
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
        return None;
    }

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender(config));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    Some(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_scopes_to_crate() {
        let mut config = LoggingConfig::default();
        assert_eq!(default_directive(&config), "sitefx=info");
        config.level = "debug".to_string();
        assert_eq!(default_directive(&config), "sitefx=debug");
    }

    #[test]
    fn test_default_directive_parses() {
        let config = LoggingConfig::default();
        assert!(EnvFilter::try_new(default_directive(&config)).is_ok());
    }
}
