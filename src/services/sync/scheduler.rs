//! Fixed-interval driver for the sync job.
//!
//! Runs the job once right away, then waits `interval` after each run ends.
//! The wait can be cut short by a manual trigger through [`SyncHandle`], and
//! the whole loop stops when the cancellation token fires.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::manager::{SyncJob, SyncReport};

/// Shared view of the scheduler for the HTTP layer.
#[derive(Clone)]
pub struct SyncHandle {
    enabled: bool,
    running: Arc<AtomicBool>,
    trigger: Arc<Notify>,
    last_report: Arc<RwLock<Option<SyncReport>>>,
}

impl SyncHandle {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            running: Arc::new(AtomicBool::new(false)),
            trigger: Arc::new(Notify::new()),
            last_report: Arc::new(RwLock::new(None)),
        }
    }

    /// A handle for a process where sync is switched off.
    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Wake the scheduler. A trigger arriving mid-run starts another run right after it.
    pub fn trigger(&self) {
        self.trigger.notify_one();
    }

    pub async fn last_report(&self) -> Option<SyncReport> {
        self.last_report.read().await.clone()
    }
}

pub struct SyncScheduler {
    job: Arc<dyn SyncJob>,
    interval: Duration,
    handle: SyncHandle,
}

impl SyncScheduler {
    pub fn new(job: Arc<dyn SyncJob>, interval: Duration, handle: SyncHandle) -> Self {
        Self {
            job,
            interval,
            handle,
        }
    }

    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(cancel).await })
    }

    async fn run(self, cancel: CancellationToken) {
        info!(
            interval_seconds = self.interval.as_secs(),
            "Event sync scheduler started"
        );

        loop {
            if cancel.is_cancelled() {
                break;
            }

            self.handle.running.store(true, Ordering::SeqCst);
            let report = self.job.run(&cancel).await;
            self.handle.running.store(false, Ordering::SeqCst);
            *self.handle.last_report.write().await = Some(report);

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {
                    debug!("Sync interval elapsed");
                }
                _ = self.handle.trigger.notified() => {
                    info!("Manual event sync requested");
                }
            }
        }

        info!("Event sync scheduler shutting down");
    }
}
