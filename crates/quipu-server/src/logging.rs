//! Structured logging setup.
//!
//! Production runs emit JSON lines; development runs get the pretty
//! human-readable format. The level string feeds an [`EnvFilter`], so
//! per-target directives like `"info,quipu_store=debug"` work too.

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Errors raised while initializing the logging subsystem.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The configured level string is not a valid filter directive.
    #[error("invalid log filter: {0}")]
    Filter(String),

    /// A global subscriber is already installed.
    #[error("logging initialization failed: {0}")]
    Init(String),
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directive (e.g. "info", "debug", "quipu_service=trace").
    pub level: String,

    /// Whether to emit JSON lines instead of pretty output.
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: true,
        }
    }
}

impl LogConfig {
    /// Creates a development configuration with human-readable output.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            json_format: false,
        }
    }
}

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Returns [`LoggingError`] if the level string is not a valid filter
/// or a subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> Result<(), LoggingError> {
    if !config.enabled {
        return Ok(());
    }

    let filter =
        EnvFilter::try_new(&config.level).map_err(|e| LoggingError::Filter(e.to_string()))?;

    if config.json_format {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_filter(filter);
        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| LoggingError::Init(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_filter(filter);
        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| LoggingError::Init(e.to_string()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_json_at_info() {
        let config = LogConfig::default();
        assert!(config.enabled);
        assert!(config.json_format);
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_development_config_is_pretty() {
        let config = LogConfig::development();
        assert!(!config.json_format);
        assert_eq!(config.level, "debug");
    }

    #[test]
    fn test_disabled_logging_is_a_no_op() {
        let config = LogConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(init_logging(&config).is_ok());
    }

    #[test]
    fn test_invalid_filter_is_rejected() {
        let config = LogConfig {
            level: "not a [valid] directive!!!".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            init_logging(&config),
            Err(LoggingError::Filter(_))
        ));
    }
}
