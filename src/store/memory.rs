//! In-memory record store implementation using DashMap
//!
//! Records live in flat name-to-string maps: one per-tenant map, plus a
//! cluster-wide map for shared-scope records in multi-tenant deployments.
//! A transient is two records (value + timeout marker); expiry is resolved
//! lazily on read and proactively by the sweeper through the same accessor.

use crate::error::Result;
use crate::store::keys;
use crate::store::{Clock, Scope, SystemClock, TransientStore};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::warn;

/// Concurrent in-memory store for transient records
#[derive(Debug)]
pub struct MemoryStore {
    /// Per-tenant records; also carries shared-scope records when no
    /// cluster namespace exists
    tenant: DashMap<String, String>,
    /// Cluster-wide records, present only in multi-tenant deployments
    cluster: Option<DashMap<String, String>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    /// Create a single-tenant store on the wall clock
    pub fn new() -> Self {
        Self::build(Arc::new(SystemClock), false)
    }

    /// Create a multi-tenant store on the wall clock
    pub fn multi_tenant() -> Self {
        Self::build(Arc::new(SystemClock), true)
    }

    /// Create a single-tenant store with an injected clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::build(clock, false)
    }

    /// Create a multi-tenant store with an injected clock
    pub fn multi_tenant_with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::build(clock, true)
    }

    fn build(clock: Arc<dyn Clock>, multi_tenant: bool) -> Self {
        Self {
            tenant: DashMap::new(),
            cluster: multi_tenant.then(DashMap::new),
            clock,
        }
    }

    /// Whether shared-scope records live in a cluster-wide namespace
    pub fn is_multi_tenant(&self) -> bool {
        self.cluster.is_some()
    }

    /// The map holding records for `scope`
    fn records(&self, scope: Scope) -> &DashMap<String, String> {
        match (scope, &self.cluster) {
            (Scope::Shared, Some(cluster)) => cluster,
            _ => &self.tenant,
        }
    }

    /// Store a transient value with a TTL in seconds.
    ///
    /// A TTL of zero means the value never expires; any marker left over
    /// from a previous timed set is removed so it cannot resurrect.
    pub async fn set_transient<V>(&self, scope: Scope, key: &str, value: V, ttl_seconds: i64) -> Result<()>
    where
        V: Into<String>,
    {
        let map = self.records(scope);

        map.insert(keys::value_record(scope, key), value.into());

        if ttl_seconds > 0 {
            let expires_at = self.clock.now_epoch() + ttl_seconds;
            map.insert(keys::timeout_record(scope, key), expires_at.to_string());
        } else {
            map.remove(&keys::timeout_record(scope, key));
        }

        Ok(())
    }

    /// Read a transient value, resolving expiry lazily.
    ///
    /// Expired entries are deleted on read and reported as absent.
    pub async fn get_transient(&self, scope: Scope, key: &str) -> Result<Option<String>> {
        self.resolve_if_expired(scope, key).await
    }

    /// Remove a transient's value record and marker explicitly
    pub async fn delete_transient(&self, scope: Scope, key: &str) -> Result<bool> {
        let map = self.records(scope);

        map.remove(&keys::timeout_record(scope, key));
        let was_removed = map.remove(&keys::value_record(scope, key)).is_some();

        Ok(was_removed)
    }

    /// Shared expiry resolution used by both the read path and the sweep.
    ///
    /// If the key's marker holds a timestamp in the past, both records are
    /// deleted and `None` is returned; otherwise the live value (if any)
    /// is returned. A marker that does not parse as an integer never
    /// expires its value.
    pub async fn resolve_if_expired(&self, scope: Scope, key: &str) -> Result<Option<String>> {
        let map = self.records(scope);
        let marker_name = keys::timeout_record(scope, key);

        if let Some(marker) = map.get(&marker_name) {
            match marker.value().parse::<i64>() {
                Ok(expires_at) => {
                    if expires_at < self.clock.now_epoch() {
                        // Release the lock before removing
                        drop(marker);
                        map.remove(&marker_name);
                        map.remove(&keys::value_record(scope, key));
                        return Ok(None);
                    }
                }
                Err(_) => {
                    warn!(
                        record = %marker_name,
                        value = %marker.value(),
                        "ignoring malformed timeout marker"
                    );
                }
            }
        }

        Ok(map.get(&keys::value_record(scope, key)).map(|record| record.value().clone()))
    }

    /// Logical key names whose marker timestamp is strictly below `cutoff`.
    ///
    /// Candidates are collected before any deletion happens, so the scan
    /// never holds map locks while evicting.
    pub async fn expired_markers(&self, scope: Scope, cutoff: i64) -> Result<Vec<String>> {
        let map = self.records(scope);
        let mut candidates = Vec::new();

        for entry in map.iter() {
            let key = match keys::strip_timeout_prefix(scope, entry.key()) {
                Some(key) => key,
                None => continue,
            };

            match entry.value().parse::<i64>() {
                Ok(expires_at) if expires_at < cutoff => candidates.push(key.to_string()),
                Ok(_) => {}
                Err(_) => {
                    warn!(
                        record = %entry.key(),
                        value = %entry.value(),
                        "skipping malformed timeout marker"
                    );
                }
            }
        }

        Ok(candidates)
    }

    /// Direct read of a raw record by name, bypassing expiry resolution.
    ///
    /// Used to inspect value and marker records independently, the way an
    /// operator would query the backing table.
    pub fn record(&self, scope: Scope, record_name: &str) -> Option<String> {
        self.records(scope)
            .get(record_name)
            .map(|record| record.value().clone())
    }

    /// Direct write of a raw record by name, bypassing the transient API
    pub fn put_record(&self, scope: Scope, record_name: &str, value: &str) {
        self.records(scope)
            .insert(record_name.to_string(), value.to_string());
    }

    /// Total number of records across all namespaces
    pub fn len(&self) -> usize {
        self.tenant.len() + self.cluster.as_ref().map_or(0, DashMap::len)
    }

    /// Check if the store holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all records from all namespaces
    pub fn clear(&self) {
        self.tenant.clear();
        if let Some(cluster) = &self.cluster {
            cluster.clear();
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransientStore for MemoryStore {
    async fn expired_markers(&self, scope: Scope, cutoff: i64) -> Result<Vec<String>> {
        MemoryStore::expired_markers(self, scope, cutoff).await
    }

    async fn resolve_if_expired(&self, scope: Scope, key: &str) -> Result<Option<String>> {
        MemoryStore::resolve_if_expired(self, scope, key).await
    }
}
