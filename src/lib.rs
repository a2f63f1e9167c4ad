//! stalesweep - a scheduled garbage collector for expired transients
//!
//! Transients are key-value entries stored next to an explicit expiry
//! timestamp (a separate timeout marker record). The read path already
//! drops an expired entry when someone asks for it; stalesweep adds the
//! proactive half, periodically scanning for markers past a safety
//! margin and forcing the same lazy-expiry resolution so entries nobody
//! reads again still get cleaned up, across both the per-tenant and the
//! shared namespace.

// Core modules
pub mod config;
pub mod error;
pub mod logging;

// Feature modules
pub mod store;
pub mod sweep;

// Public API exports
pub use config::{Config, DeploymentConfig, LogFormat, LoggingConfig, SweepConfig};
pub use error::{Result, StalesweepError};
pub use logging::LoggingSystem;
pub use store::{Clock, ManualClock, MemoryStore, Scope, SystemClock, TransientStore};
pub use sweep::{ScopeOutcome, SweepReport, SweepSchedule, Sweeper};

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// A sweeper wired to its store, clock, and schedule.
///
/// The host owns the composition: it builds one store and one sweeper
/// from configuration and hands the sweeper to a schedule on `start()`.
/// There is no ambient global; embedders that already have a store or
/// clock inject them through `with_components`.
pub struct SweeperHost {
    config: Arc<Config>,
    store: Arc<MemoryStore>,
    sweeper: Sweeper<MemoryStore>,
    schedule: Option<SweepSchedule>,
}

impl SweeperHost {
    /// Create a host from configuration, on the wall clock
    pub fn new(config: Config) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let store = if config.deployment.multi_tenant {
            Arc::new(MemoryStore::multi_tenant_with_clock(Arc::clone(&clock)))
        } else {
            Arc::new(MemoryStore::with_clock(Arc::clone(&clock)))
        };
        Self::with_components(config, store, clock)
    }

    /// Create a host around an existing store and clock
    pub fn with_components(config: Config, store: Arc<MemoryStore>, clock: Arc<dyn Clock>) -> Self {
        let sweeper = Sweeper::new(Arc::clone(&store), clock, config.sweep.margin_seconds);

        Self {
            config: Arc::new(config),
            store,
            sweeper,
            schedule: None,
        }
    }

    /// Start the recurring sweep schedule.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) -> Result<()> {
        if self.schedule.is_some() {
            return Err(StalesweepError::InternalError(
                "sweep schedule already started".to_string(),
            ));
        }

        let interval = Duration::from_secs(self.config.sweep.interval_seconds);
        self.schedule = Some(SweepSchedule::new(self.sweeper.clone(), interval));
        Ok(())
    }

    /// Run one sweep now, independent of the schedule
    pub async fn scan(&self) -> SweepReport {
        self.sweeper.scan().await
    }

    /// Ask the running schedule for an out-of-cadence sweep
    pub fn trigger_sweep(&self) -> Result<()> {
        match &self.schedule {
            Some(schedule) => schedule.trigger(),
            None => Err(StalesweepError::InternalError(
                "sweep schedule not started".to_string(),
            )),
        }
    }

    /// Subscribe to the completion event fired after every sweep
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sweeper.subscribe()
    }

    /// Stop the schedule, if running
    pub async fn shutdown(&mut self) -> Result<()> {
        if let Some(mut schedule) = self.schedule.take() {
            schedule.shutdown().await?;
        }
        Ok(())
    }

    /// Get the host configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get a reference to the store
    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.store
    }
}
