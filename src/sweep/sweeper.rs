//! Expiry sweep over the transient store
//!
//! The sweeper queries each scope for timeout markers past a safety
//! margin and forces the store's lazy-expiry resolution for every
//! candidate. Eviction logic lives in one place (the resolver shared with
//! the read path); the sweep only makes it run earlier than the next
//! organic read.

use crate::store::{Clock, Scope, SystemClock, TransientStore};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, warn};

/// Entries must be at least this far past expiry before a sweep touches
/// them, so a scan never races entries expiring in the same instant.
pub const DEFAULT_MARGIN_SECONDS: i64 = 60;

/// Per-scope outcome of a single sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeOutcome {
    /// Markers found past the cutoff
    pub candidates: usize,
    /// Candidates whose records are gone after resolution
    pub evicted: usize,
    /// Candidates still live at resolution time (refreshed in between)
    pub refreshed: usize,
    /// Candidates whose resolution failed and was skipped
    pub failed: usize,
}

/// Outcome of one `scan()` call
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    pub local: ScopeOutcome,
    pub shared: ScopeOutcome,
    /// Scope-level query failures; the scope was skipped entirely
    pub scope_failures: Vec<String>,
}

impl SweepReport {
    fn scope_mut(&mut self, scope: Scope) -> &mut ScopeOutcome {
        match scope {
            Scope::Local => &mut self.local,
            Scope::Shared => &mut self.shared,
        }
    }

    /// Total evictions across both scopes
    pub fn total_evicted(&self) -> usize {
        self.local.evicted + self.shared.evicted
    }

    /// Whether every step of the sweep completed without error
    pub fn is_clean(&self) -> bool {
        self.scope_failures.is_empty() && self.local.failed == 0 && self.shared.failed == 0
    }
}

/// Garbage collector for expired transients.
///
/// Holds no state across invocations; each `scan()` is a pure function of
/// the store's contents and the current time. Clones share the same
/// completion channel, so a clone handed to a scheduler still notifies
/// subscribers obtained from the original.
#[derive(Debug)]
pub struct Sweeper<S: TransientStore> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    margin_seconds: i64,
    completed: broadcast::Sender<()>,
}

impl<S: TransientStore> Clone for Sweeper<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            margin_seconds: self.margin_seconds,
            completed: self.completed.clone(),
        }
    }
}

impl<S: TransientStore> Sweeper<S> {
    /// Create a sweeper with an injected clock and safety margin
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, margin_seconds: i64) -> Self {
        let (completed, _) = broadcast::channel(16);
        Self {
            store,
            clock,
            margin_seconds,
            completed,
        }
    }

    /// Create a sweeper on the wall clock with the default margin
    pub fn new_with_defaults(store: Arc<S>) -> Self {
        Self::new(store, Arc::new(SystemClock), DEFAULT_MARGIN_SECONDS)
    }

    /// The safety margin applied to the cutoff
    pub fn margin_seconds(&self) -> i64 {
        self.margin_seconds
    }

    /// Subscribe to the zero-payload completion event fired once per scan
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.completed.subscribe()
    }

    /// Sweep both scopes for expired transients.
    ///
    /// Infallible from the caller's perspective: scope-level query
    /// failures skip that scope, per-key resolution failures skip that
    /// key, and everything that went wrong is reported in the returned
    /// `SweepReport`. The completion event fires exactly once, after all
    /// evictions were attempted.
    ///
    /// Known limitation: the marker query and the per-key resolution are
    /// not one atomic step. The resolver re-checks the marker before
    /// deleting, so a transient refreshed in between survives unless its
    /// new expiry has also passed; no compare-and-delete is taken beyond
    /// that.
    pub async fn scan(&self) -> SweepReport {
        let cutoff = self.clock.now_epoch() - self.margin_seconds;
        let mut report = SweepReport::default();

        for scope in [Scope::Local, Scope::Shared] {
            self.sweep_scope(scope, cutoff, &mut report).await;
        }

        debug!(
            local_evicted = report.local.evicted,
            shared_evicted = report.shared.evicted,
            failures = report.scope_failures.len(),
            "sweep complete"
        );

        // Nobody listening is fine
        let _ = self.completed.send(());

        report
    }

    async fn sweep_scope(&self, scope: Scope, cutoff: i64, report: &mut SweepReport) {
        let candidates = match self.store.expired_markers(scope, cutoff).await {
            Ok(candidates) => candidates,
            Err(e) => {
                error!(%scope, error = %e, "expired-marker query failed, skipping scope");
                report.scope_failures.push(e.to_string());
                return;
            }
        };

        let outcome = report.scope_mut(scope);
        outcome.candidates = candidates.len();

        for key in candidates {
            match self.store.resolve_if_expired(scope, &key).await {
                Ok(None) => outcome.evicted += 1,
                Ok(Some(_)) => outcome.refreshed += 1,
                Err(e) => {
                    warn!(%scope, key = %key, error = %e, "eviction failed, skipping key");
                    outcome.failed += 1;
                }
            }
        }
    }
}
