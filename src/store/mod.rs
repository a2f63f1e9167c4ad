//! Storage layer for transient records
//!
//! This module provides the record-level store the sweeper operates on:
//! the in-memory reference implementation, the record naming scheme, and
//! the `TransientStore` contract that abstracts the two operations the
//! sweep path consumes.

pub mod clock;
pub mod keys;
pub mod memory;

pub use clock::{Clock, ManualClock, SystemClock};
pub use memory::MemoryStore;

use crate::error::Result;
use async_trait::async_trait;
use std::fmt;

/// Namespace partition for transient records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Per-tenant namespace
    Local,
    /// Cross-tenant namespace in multi-tenant deployments; a second
    /// per-tenant namespace otherwise
    Shared,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Local => write!(f, "local"),
            Scope::Shared => write!(f, "shared"),
        }
    }
}

/// Store contract consumed by the sweeper.
///
/// The sweep path needs exactly two operations: finding the timeout
/// markers that have passed a cutoff, and forcing the lazy-expiry
/// resolution that the read path also uses. Keeping eviction behind
/// `resolve_if_expired` means the sweep never second-guesses what the
/// read path considers expired.
#[async_trait]
pub trait TransientStore: Send + Sync {
    /// Logical key names whose timeout marker is strictly older than
    /// `cutoff` (Unix seconds). Malformed markers are never reported.
    async fn expired_markers(&self, scope: Scope, cutoff: i64) -> Result<Vec<String>>;

    /// Run the lazy-expiry resolution for `key`: delete the value record
    /// and its marker if the marker has passed, and return the value that
    /// remains live. Idempotent and safe to call on absent or
    /// already-evicted keys.
    async fn resolve_if_expired(&self, scope: Scope, key: &str) -> Result<Option<String>>;
}
