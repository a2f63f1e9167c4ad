//! Expiry sweeping
//!
//! This module provides the garbage collector for expired transients:
//! the scan-and-evict algorithm and the recurring schedule that drives it.

pub mod schedule;
pub mod sweeper;

pub use schedule::{ScheduleCommand, SweepSchedule, DEFAULT_SWEEP_INTERVAL};
pub use sweeper::{ScopeOutcome, SweepReport, Sweeper, DEFAULT_MARGIN_SECONDS};
