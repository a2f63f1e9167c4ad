//! Structured logging infrastructure for stalesweep
//!
//! This module provides tracing subscriber setup with selectable output
//! formats and optional file output, driven by `LoggingConfig`.

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{Result, StalesweepError};
use std::path::Path;
use std::sync::Arc;
use tracing::{warn, Level};
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Logging system manager that handles structured logging setup
#[derive(Debug)]
pub struct LoggingSystem {
    config: LoggingConfig,
}

impl LoggingSystem {
    /// Create a new logging system with the given configuration
    pub fn new(config: LoggingConfig) -> Self {
        Self { config }
    }

    /// Initialize the tracing subscriber.
    ///
    /// Safe to call more than once in a process; a subscriber that is
    /// already installed wins and a warning is emitted.
    pub fn initialize(&self) -> Result<()> {
        let log_level = self.parse_log_level(&self.config.level)?;

        let env_filter = EnvFilter::builder()
            .with_default_directive(log_level.into())
            .from_env_lossy()
            .add_directive("stalesweep=debug".parse().unwrap())
            .add_directive("tokio=info".parse().unwrap());

        match (&self.config.format, &self.config.file_path) {
            (LogFormat::Json, Some(file_path)) => self.setup_json_file_logging(env_filter, file_path),
            (LogFormat::Json, None) => self.setup_json_console_logging(env_filter),
            (LogFormat::Pretty, Some(file_path)) => {
                self.setup_pretty_file_logging(env_filter, file_path)
            }
            (LogFormat::Pretty, None) => self.setup_pretty_console_logging(env_filter),
            (LogFormat::Compact, Some(file_path)) => {
                self.setup_compact_file_logging(env_filter, file_path)
            }
            (LogFormat::Compact, None) => self.setup_compact_console_logging(env_filter),
        }
    }

    /// Parse log level string to tracing Level
    fn parse_log_level(&self, level_str: &str) -> Result<Level> {
        match level_str.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => Err(StalesweepError::ConfigError(format!(
                "invalid log level: {level_str}"
            ))),
        }
    }

    fn open_log_file(&self, file_path: &Path) -> Result<std::fs::File> {
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StalesweepError::InternalError(format!("failed to create log directory: {e}"))
            })?;
        }

        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)
            .map_err(|e| StalesweepError::InternalError(format!("failed to open log file: {e}")))
    }

    fn setup_json_console_logging(&self, env_filter: EnvFilter) -> Result<()> {
        let subscriber = Registry::default().with(env_filter).with(
            fmt::layer()
                .json()
                .with_timer(ChronoUtc::rfc_3339())
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        );

        if let Err(e) = subscriber.try_init() {
            warn!(
                "Failed to initialize tracing subscriber (may already be set): {}",
                e
            );
        }
        Ok(())
    }

    fn setup_json_file_logging(&self, env_filter: EnvFilter, file_path: &Path) -> Result<()> {
        let file = self.open_log_file(file_path)?;

        let subscriber = Registry::default().with(env_filter).with(
            fmt::layer()
                .json()
                .with_writer(Arc::new(file))
                .with_timer(ChronoUtc::rfc_3339())
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        );

        if let Err(e) = subscriber.try_init() {
            warn!(
                "Failed to initialize tracing subscriber (may already be set): {}",
                e
            );
        }
        Ok(())
    }

    fn setup_pretty_console_logging(&self, env_filter: EnvFilter) -> Result<()> {
        let subscriber = Registry::default().with(env_filter).with(
            fmt::layer()
                .pretty()
                .with_timer(ChronoUtc::rfc_3339())
                .with_target(true)
                .with_file(false)
                .with_line_number(false),
        );

        if let Err(e) = subscriber.try_init() {
            warn!(
                "Failed to initialize tracing subscriber (may already be set): {}",
                e
            );
        }
        Ok(())
    }

    fn setup_pretty_file_logging(&self, env_filter: EnvFilter, file_path: &Path) -> Result<()> {
        let file = self.open_log_file(file_path)?;

        let subscriber = Registry::default().with(env_filter).with(
            fmt::layer()
                .with_writer(Arc::new(file))
                .with_timer(ChronoUtc::rfc_3339())
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        );

        if let Err(e) = subscriber.try_init() {
            warn!(
                "Failed to initialize tracing subscriber (may already be set): {}",
                e
            );
        }
        Ok(())
    }

    fn setup_compact_console_logging(&self, env_filter: EnvFilter) -> Result<()> {
        let subscriber = Registry::default().with(env_filter).with(
            fmt::layer()
                .compact()
                .with_timer(ChronoUtc::rfc_3339())
                .with_target(false)
                .with_file(false)
                .with_line_number(false),
        );

        if let Err(e) = subscriber.try_init() {
            warn!(
                "Failed to initialize tracing subscriber (may already be set): {}",
                e
            );
        }
        Ok(())
    }

    fn setup_compact_file_logging(&self, env_filter: EnvFilter, file_path: &Path) -> Result<()> {
        let file = self.open_log_file(file_path)?;

        let subscriber = Registry::default().with(env_filter).with(
            fmt::layer()
                .compact()
                .with_writer(Arc::new(file))
                .with_timer(ChronoUtc::rfc_3339())
                .with_target(true)
                .with_file(false)
                .with_line_number(false),
        );

        if let Err(e) = subscriber.try_init() {
            warn!(
                "Failed to initialize tracing subscriber (may already be set): {}",
                e
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoggingConfig;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_parse_log_level() {
        let logging_system = LoggingSystem::new(LoggingConfig::default());

        assert!(matches!(
            logging_system.parse_log_level("trace"),
            Ok(Level::TRACE)
        ));
        assert!(matches!(
            logging_system.parse_log_level("debug"),
            Ok(Level::DEBUG)
        ));
        assert!(matches!(
            logging_system.parse_log_level("info"),
            Ok(Level::INFO)
        ));
        assert!(matches!(
            logging_system.parse_log_level("warn"),
            Ok(Level::WARN)
        ));
        assert!(matches!(
            logging_system.parse_log_level("error"),
            Ok(Level::ERROR)
        ));

        // Case insensitive
        assert!(matches!(
            logging_system.parse_log_level("INFO"),
            Ok(Level::INFO)
        ));

        assert!(logging_system.parse_log_level("invalid").is_err());
    }

    #[test]
    fn test_initialize_rejects_invalid_level() {
        let config = LoggingConfig {
            level: "verbose".to_string(),
            ..LoggingConfig::default()
        };
        let logging_system = LoggingSystem::new(config);

        assert!(logging_system.initialize().is_err());
    }

    #[test]
    fn test_open_log_file_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("nested").join("test.log");

        let logging_system = LoggingSystem::new(LoggingConfig::default());
        let file = logging_system.open_log_file(&log_path);

        assert!(file.is_ok());
        assert!(log_path.exists());
    }

    #[test]
    fn test_open_log_file_invalid_path() {
        let logging_system = LoggingSystem::new(LoggingConfig::default());
        let result = logging_system.open_log_file(&PathBuf::from("/proc/invalid/test.log"));

        assert!(result.is_err());
    }
}
