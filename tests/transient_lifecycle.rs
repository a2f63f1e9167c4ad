//! End-to-end lifecycle tests for transients and the sweeper
//!
//! These drive the public API the way a host deployment would: set
//! transients with TTLs, move the clock, and verify what the read path
//! and the sweep each clean up, down to the individual value and marker
//! records.

use stalesweep::{
    Clock, Config, ManualClock, MemoryStore, Scope, SweepSchedule, Sweeper, SweeperHost,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

const START: i64 = 1_700_000_000;

fn harness() -> (Arc<ManualClock>, Arc<MemoryStore>, Sweeper<MemoryStore>) {
    let clock = Arc::new(ManualClock::new(START));
    let store = Arc::new(MemoryStore::with_clock(clock.clone()));
    let sweeper = Sweeper::new(store.clone(), clock.clone(), 60);
    (clock, store, sweeper)
}

#[tokio::test]
async fn lazy_expiry_works_without_the_sweeper() {
    let (clock, store, _sweeper) = harness();

    store
        .set_transient(Scope::Local, "key1", "value1", 5)
        .await
        .unwrap();

    // Immediately reading back returns the value
    assert_eq!(
        store.get_transient(Scope::Local, "key1").await.unwrap(),
        Some("value1".to_string())
    );

    // The two underlying records exist independently: the raw value and
    // a marker holding an integer timestamp in the future
    assert_eq!(
        store.record(Scope::Local, "transient:key1"),
        Some("value1".to_string())
    );
    let marker = store.record(Scope::Local, "transient:timeout:key1").unwrap();
    assert!(marker.parse::<i64>().unwrap() > clock.now_epoch());

    clock.advance(120);

    // The marker is now in the past
    let marker = store.record(Scope::Local, "transient:timeout:key1").unwrap();
    assert!(marker.parse::<i64>().unwrap() < clock.now_epoch());

    // Reading without any sweep resolves the expiry and removes both records
    assert_eq!(store.get_transient(Scope::Local, "key1").await.unwrap(), None);
    assert!(store.record(Scope::Local, "transient:key1").is_none());
    assert!(store.record(Scope::Local, "transient:timeout:key1").is_none());
}

#[tokio::test]
async fn sweep_evicts_expired_records_before_any_read() {
    let (clock, store, sweeper) = harness();

    store
        .set_transient(Scope::Local, "key2", "value2", 5)
        .await
        .unwrap();
    clock.advance(120);

    sweeper.scan().await;

    // Both the value record and the marker are gone without a read
    assert!(store.record(Scope::Local, "transient:key2").is_none());
    assert!(store.record(Scope::Local, "transient:timeout:key2").is_none());
    assert_eq!(store.get_transient(Scope::Local, "key2").await.unwrap(), None);
}

#[tokio::test]
async fn sweep_leaves_unexpired_records_untouched() {
    let (_clock, store, sweeper) = harness();

    store
        .set_transient(Scope::Local, "key3", "value3", 3_600)
        .await
        .unwrap();

    sweeper.scan().await;

    assert_eq!(
        store.record(Scope::Local, "transient:key3"),
        Some("value3".to_string())
    );
    assert!(store.record(Scope::Local, "transient:timeout:key3").is_some());
    assert_eq!(
        store.get_transient(Scope::Local, "key3").await.unwrap(),
        Some("value3".to_string())
    );
}

#[tokio::test]
async fn sweep_is_idempotent_and_scope_safe() {
    let (clock, store, sweeper) = harness();

    store
        .set_transient(Scope::Local, "expired", "a", 5)
        .await
        .unwrap();
    store
        .set_transient(Scope::Shared, "expired", "b", 7_200)
        .await
        .unwrap();
    clock.advance(300);

    let first = sweeper.scan().await;
    assert_eq!(first.local.evicted, 1);
    assert_eq!(first.shared.candidates, 0);

    // Shared entry with the same key name survives its local namesake
    assert_eq!(
        store.get_transient(Scope::Shared, "expired").await.unwrap(),
        Some("b".to_string())
    );

    let second = sweeper.scan().await;
    assert_eq!(second.total_evicted(), 0);
}

#[tokio::test]
async fn completion_event_fires_once_per_scan() {
    let (_clock, _store, sweeper) = harness();
    let mut events = sweeper.subscribe();

    sweeper.scan().await;
    sweeper.scan().await;

    assert!(events.try_recv().is_ok());
    assert!(events.try_recv().is_ok());
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn multi_tenant_sweep_covers_cluster_namespace() {
    let clock = Arc::new(ManualClock::new(START));
    let store = Arc::new(MemoryStore::multi_tenant_with_clock(clock.clone()));
    let sweeper = Sweeper::new(store.clone(), clock.clone(), 60);

    store
        .set_transient(Scope::Local, "tenant-key", "v", 5)
        .await
        .unwrap();
    store
        .set_transient(Scope::Shared, "cluster-key", "v", 5)
        .await
        .unwrap();
    clock.advance(120);

    let report = sweeper.scan().await;

    assert_eq!(report.local.evicted, 1);
    assert_eq!(report.shared.evicted, 1);
    assert!(store.is_empty());
}

#[tokio::test]
async fn scheduled_sweep_cleans_up_unread_entries() {
    let clock = Arc::new(ManualClock::new(START));
    let store = Arc::new(MemoryStore::with_clock(clock.clone()));
    let sweeper = Sweeper::new(store.clone(), clock.clone(), 60);

    store
        .set_transient(Scope::Local, "forgotten", "value", 5)
        .await
        .unwrap();
    clock.advance(120);

    let mut schedule = SweepSchedule::new(sweeper, Duration::from_millis(20));
    sleep(Duration::from_millis(100)).await;

    assert!(store.is_empty());
    schedule.shutdown().await.unwrap();
}

#[tokio::test]
async fn host_wires_store_sweeper_and_schedule() {
    let clock = Arc::new(ManualClock::new(START));
    let store = Arc::new(MemoryStore::with_clock(clock.clone()));

    let mut config = Config::default();
    config.sweep.interval_seconds = 3_600;
    let mut host = SweeperHost::with_components(config, store.clone(), clock.clone());
    let mut events = host.subscribe();

    store
        .set_transient(Scope::Local, "key", "value", 5)
        .await
        .unwrap();
    clock.advance(120);

    host.start().unwrap();
    // The schedule's startup sweep evicts the expired entry
    sleep(Duration::from_millis(100)).await;

    assert!(store.is_empty());
    assert!(events.try_recv().is_ok());

    host.shutdown().await.unwrap();
}
