//! Periodic refresh scheduling.
//!
//! Wraps a [`RefreshService`] in a background task that runs one cycle per
//! tick. A tick that arrives while a cycle is still running is delayed, not
//! queued, so slow cycles never build a backlog.

use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::time::Duration;

use log::{error, info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::refresh::RefreshService;
use super::report::CycleReport;
use super::store::PriceStore;
use crate::constants::{DEFAULT_REFRESH_INITIAL_DELAY_SECS, DEFAULT_REFRESH_INTERVAL_SECS};
use crate::errors::Result;
use crate::holdings::HoldingStore;

/// Cadence settings for the background refresh task.
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    /// Pause between cycle starts.
    pub interval: Duration,
    /// Delay before the first cycle after `start`.
    pub initial_delay: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
            initial_delay: Duration::from_secs(DEFAULT_REFRESH_INITIAL_DELAY_SECS),
        }
    }
}

struct RunningScheduler {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Drives periodic refresh cycles on the runtime's clock.
///
/// Dropping the scheduler without calling [`stop`](Self::stop) leaves the
/// background task running until the runtime shuts down.
pub struct RefreshScheduler<H, P> {
    service: Arc<RefreshService<H, P>>,
    config: SchedulerConfig,
    handle: StdMutex<Option<RunningScheduler>>,
}

impl<H, P> RefreshScheduler<H, P>
where
    H: HoldingStore + 'static,
    P: PriceStore + 'static,
{
    pub fn new(service: Arc<RefreshService<H, P>>, config: SchedulerConfig) -> Self {
        Self {
            service,
            config,
            handle: StdMutex::new(None),
        }
    }

    /// Runs one cycle immediately, outside the periodic cadence.
    ///
    /// Shares the service's cycle guard, so a manual run and a scheduled run
    /// never overlap.
    pub async fn run_once(&self) -> Result<CycleReport> {
        self.service.run_once().await
    }

    /// Spawns the background task. Calling `start` while already running is
    /// a no-op.
    pub fn start(&self) {
        let mut handle = self.lock_handle();
        if handle.is_some() {
            warn!("Refresh scheduler already running; ignoring start");
            return;
        }

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let service = Arc::clone(&self.service);
        let config = self.config.clone();

        let task = tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(config.initial_delay) => {}
                _ = shutdown_rx.changed() => return,
            }

            let mut ticker = tokio::time::interval(config.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        // Awaited inside the tick arm: an in-flight cycle
                        // always completes, even during shutdown.
                        match service.run_once().await {
                            Ok(report) => info!("Scheduled refresh: {}", report.summary()),
                            Err(e) => error!("Scheduled refresh failed: {}", e),
                        }
                    }
                    _ = shutdown_rx.changed() => return,
                }
            }
        });

        *handle = Some(RunningScheduler {
            shutdown: shutdown_tx,
            task,
        });
        info!(
            "Refresh scheduler started (interval {:?}, initial delay {:?})",
            self.config.interval, self.config.initial_delay
        );
    }

    /// Signals the background task and waits for it to finish. A cycle in
    /// flight completes first. Safe to call when not running.
    pub async fn stop(&self) {
        let running = self.lock_handle().take();
        let Some(running) = running else {
            return;
        };

        // Send fails only when the task already exited; join below still
        // reaps it either way.
        let _ = running.shutdown.send(true);
        if let Err(join_error) = running.task.await {
            if join_error.is_panic() {
                error!("Refresh scheduler task panicked");
            }
        }
        info!("Refresh scheduler stopped");
    }

    pub fn is_running(&self) -> bool {
        self.lock_handle().is_some()
    }

    fn lock_handle(&self) -> std::sync::MutexGuard<'_, Option<RunningScheduler>> {
        self.handle.lock().unwrap_or_else(|poisoned| {
            warn!("Scheduler handle mutex poisoned; recovering");
            poisoned.into_inner()
        })
    }
}
