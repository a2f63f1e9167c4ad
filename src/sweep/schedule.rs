//! Sweep scheduling
//!
//! Runs the sweeper on a coarse recurring interval from a background
//! task, with a command channel for manual triggers and shutdown. The
//! original deployment swept daily; the interval is configurable down to
//! whatever the embedder needs.

use crate::error::{Result, StalesweepError};
use crate::store::TransientStore;
use crate::sweep::Sweeper;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, error, warn};

/// Default time between scheduled sweeps (daily)
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(86_400);

/// Commands for the sweep schedule
#[derive(Debug)]
pub enum ScheduleCommand {
    /// Run a sweep now, outside the regular cadence
    TriggerSweep,
    /// Stop the schedule task
    Shutdown,
}

/// Background schedule driving `Sweeper::scan()` at a recurring interval
pub struct SweepSchedule {
    command_sender: mpsc::UnboundedSender<ScheduleCommand>,
    task_handle: Option<tokio::task::JoinHandle<()>>,
}

impl SweepSchedule {
    /// Spawn the schedule task sweeping at the given interval.
    ///
    /// The first sweep runs immediately; overlap is impossible because
    /// the task runs scans one at a time.
    pub fn new<S>(sweeper: Sweeper<S>, sweep_interval: Duration) -> Self
    where
        S: TransientStore + 'static,
    {
        let (command_sender, command_receiver) = mpsc::unbounded_channel();

        let task_handle = tokio::spawn(Self::schedule_task(
            sweeper,
            command_receiver,
            sweep_interval,
        ));

        Self {
            command_sender,
            task_handle: Some(task_handle),
        }
    }

    /// Spawn the schedule with the default daily interval
    pub fn new_with_default_interval<S>(sweeper: Sweeper<S>) -> Self
    where
        S: TransientStore + 'static,
    {
        Self::new(sweeper, DEFAULT_SWEEP_INTERVAL)
    }

    /// Request an out-of-cadence sweep
    pub fn trigger(&self) -> Result<()> {
        self.command_sender
            .send(ScheduleCommand::TriggerSweep)
            .map_err(|_| {
                StalesweepError::InternalError("sweep schedule task is not running".to_string())
            })
    }

    /// Stop the schedule and wait for the task to finish
    pub async fn shutdown(&mut self) -> Result<()> {
        if self.command_sender.send(ScheduleCommand::Shutdown).is_err() {
            warn!("Failed to send shutdown command to sweep schedule");
        }

        if let Some(handle) = self.task_handle.take() {
            if let Err(e) = handle.await {
                error!("Sweep schedule task failed: {}", e);
                return Err(StalesweepError::InternalError(format!(
                    "sweep schedule task failed: {e}"
                )));
            }
        }

        Ok(())
    }

    async fn schedule_task<S>(
        sweeper: Sweeper<S>,
        mut command_receiver: mpsc::UnboundedReceiver<ScheduleCommand>,
        sweep_interval: Duration,
    ) where
        S: TransientStore + 'static,
    {
        let mut interval_timer = interval(sweep_interval);

        debug!("Sweep schedule started with interval {:?}", sweep_interval);

        loop {
            tokio::select! {
                command = command_receiver.recv() => {
                    match command {
                        Some(ScheduleCommand::TriggerSweep) => {
                            debug!("Manual sweep triggered");
                            sweeper.scan().await;
                        }
                        Some(ScheduleCommand::Shutdown) => {
                            debug!("Sweep schedule received shutdown command");
                            break;
                        }
                        None => {
                            warn!("Sweep schedule command channel closed unexpectedly");
                            break;
                        }
                    }
                }

                _ = interval_timer.tick() => {
                    sweeper.scan().await;
                }
            }
        }

        debug!("Sweep schedule task shutting down");
    }
}

impl Drop for SweepSchedule {
    fn drop(&mut self) {
        // Attempt to shutdown gracefully if not already done
        if self.task_handle.is_some() {
            let _ = self.command_sender.send(ScheduleCommand::Shutdown);
        }
    }
}
