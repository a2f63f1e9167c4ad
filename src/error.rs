//! Error types and handling for stalesweep
//!
//! This module defines the error taxonomy shared by the store contract
//! and the sweeper, and classifies which failures are local to a single
//! candidate versus a whole scope.

use thiserror::Error;

/// Main error type for stalesweep operations
#[derive(Debug, Error)]
pub enum StalesweepError {
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Eviction failed for key '{key}': {reason}")]
    EvictionFailed { key: String, reason: String },

    #[error("Malformed timeout marker '{name}': {value:?}")]
    MalformedMarker { name: String, value: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, StalesweepError>;

impl StalesweepError {
    /// Check if the error affects a single candidate key only.
    ///
    /// Per-key failures are logged and skipped during a sweep; anything
    /// else terminates the current scope.
    pub fn is_per_key(&self) -> bool {
        matches!(
            self,
            StalesweepError::EvictionFailed { .. } | StalesweepError::MalformedMarker { .. }
        )
    }
}
