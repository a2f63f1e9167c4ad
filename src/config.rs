//! Configuration management for stalesweep
//!
//! This module defines the configuration sections for the sweep cadence,
//! the deployment topology, and logging output.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for a sweeper host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub sweep: SweepConfig,
    pub deployment: DeploymentConfig,
    pub logging: LoggingConfig,
}

/// Sweep cadence and safety margin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Seconds between scheduled sweeps
    pub interval_seconds: u64,
    /// Markers must be at least this many seconds past expiry to be evicted
    pub margin_seconds: i64,
}

/// Deployment topology
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Shared-scope records live in a cluster-wide namespace when true
    pub multi_tenant: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub file_path: Option<PathBuf>,
}

/// Log output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sweep: SweepConfig::default(),
            deployment: DeploymentConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 86_400,
            margin_seconds: 60,
        }
    }
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self { multi_tenant: false }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            file_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.sweep.interval_seconds, 86_400);
        assert_eq!(config.sweep.margin_seconds, 60);
        assert!(!config.deployment.multi_tenant);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file_path.is_none());
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let mut config = Config::default();
        config.sweep.interval_seconds = 3600;
        config.deployment.multi_tenant = true;
        config.logging.level = "debug".to_string();

        let json = serde_json::to_string(&config).unwrap();
        let restored: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.sweep.interval_seconds, 3600);
        assert_eq!(restored.sweep.margin_seconds, 60);
        assert!(restored.deployment.multi_tenant);
        assert_eq!(restored.logging.level, "debug");
    }
}
