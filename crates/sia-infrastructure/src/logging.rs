//! Structured logging with tracing
//!
//! Centralized logging configuration over the tracing ecosystem. The
//! filter honors the `SIA_LOG` environment variable over the configured
//! level, so a deployment can raise verbosity without touching files.

use crate::constants::LOG_FILTER_ENV;
// Re-export LoggingConfig for convenience
pub use crate::config::{LogFormat, LoggingConfig};
use sia_domain::error::{Error, Result};
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize logging with the provided configuration
///
/// Safe to call once per process; a second call fails inside
/// tracing-subscriber and the error is surfaced as a configuration
/// error.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let level = parse_log_level(&config.level)?;
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    // The builder types diverge per format, hence the three branches
    let init_result = match config.format {
        LogFormat::Pretty => fmt()
            .pretty()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
        LogFormat::Compact => fmt()
            .compact()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_current_span(false)
            .try_init(),
    };
    init_result.map_err(|e| {
        Error::configuration(format!("Failed to initialize logging: {e}"))
    })?;

    info!(%level, "logging initialized");
    Ok(())
}

/// Parse log level string to tracing Level
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(Error::configuration(format!(
            "Invalid log level: {level}. Use trace, debug, info, warn, or error"
        ))),
    }
}

/// Log configuration loading status
pub fn log_config_loaded(config_path: &std::path::Path, success: bool) {
    if success {
        info!("Configuration loaded from {}", config_path.display());
    } else {
        warn!("Configuration file not found: {}", config_path.display());
    }
}
