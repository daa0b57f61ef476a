//! Interval scheduler for reconciliation sweeps
//!
//! One background task runs a sweep right away and then once per interval.
//! Sweeps run inline in that task, so an overrunning sweep pushes the next
//! tick back instead of overlapping with it.

use super::{SweepReport, VimReconciler};
use crate::health::{components, HealthRegistry, SweepSummary};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

/// Default sweep interval (5 minutes)
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(300);

const MIN_SYNC_INTERVAL: Duration = Duration::from_secs(1);

struct RunningTask {
    shutdown_tx: broadcast::Sender<()>,
    handle: JoinHandle<()>,
}

/// Owns the background sweep task and its start/stop lifecycle
pub struct SyncScheduler {
    reconciler: Arc<VimReconciler>,
    interval: Duration,
    health: Option<HealthRegistry>,
    running: Option<RunningTask>,
}

impl SyncScheduler {
    pub fn new(reconciler: Arc<VimReconciler>, interval: Duration) -> Self {
        Self {
            reconciler,
            interval: interval.max(MIN_SYNC_INTERVAL),
            health: None,
            running: None,
        }
    }

    /// Report sweep results into a health registry
    pub fn with_health(mut self, health: HealthRegistry) -> Self {
        self.health = Some(health);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .map(|task| !task.handle.is_finished())
            .unwrap_or(false)
    }

    /// Spawn the sweep task. Returns false if it is already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let handle = tokio::spawn(run_loop(
            self.reconciler.clone(),
            self.health.clone(),
            self.interval,
            shutdown_rx,
        ));

        self.running = Some(RunningTask {
            shutdown_tx,
            handle,
        });
        true
    }

    /// Signal the sweep task to stop and wait for it. A sweep in progress
    /// is allowed to finish first.
    pub async fn stop(&mut self) {
        let Some(task) = self.running.take() else {
            return;
        };

        let _ = task.shutdown_tx.send(());
        if let Err(e) = task.handle.await {
            warn!(error = %e, "Sync scheduler task ended abnormally");
        }

        if let Some(health) = &self.health {
            health.set_ready(false).await;
            health
                .set_unhealthy(components::SCHEDULER, "scheduler stopped")
                .await;
        }
    }

    /// Run a single sweep inline, with the same failure handling as the loop
    pub async fn run_once(&self) -> Option<SweepReport> {
        run_sweep(&self.reconciler, self.health.as_ref()).await
    }
}

async fn run_loop(
    reconciler: Arc<VimReconciler>,
    health: Option<HealthRegistry>,
    period: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    info!(interval_secs = period.as_secs(), "Starting sync scheduler");

    if let Some(health) = &health {
        health.register(components::SCHEDULER).await;
        health.set_ready(true).await;
    }

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                run_sweep(&reconciler, health.as_ref()).await;
            }
            _ = shutdown.recv() => {
                info!("Shutting down sync scheduler");
                break;
            }
        }
    }
}

/// Run one sweep; enumeration failures are logged and never propagated
async fn run_sweep(reconciler: &VimReconciler, health: Option<&HealthRegistry>) -> Option<SweepReport> {
    let metrics = reconciler.metrics();
    let start = Instant::now();
    metrics.inc_sweeps();

    let result = reconciler.sweep().await;
    let elapsed = start.elapsed();
    metrics.observe_sweep_duration(elapsed.as_secs_f64());

    match result {
        Ok(report) => {
            let totals = report.totals();
            reconciler.logger().log_sweep_complete(
                report.outcomes.len(),
                totals.created,
                totals.existing,
                totals.failed + totals.orphaned,
                elapsed.as_millis(),
            );
            if let Some(health) = health {
                health.set_healthy(components::INVENTORY).await;
                health
                    .record_sweep(SweepSummary {
                        finished_at: chrono::Utc::now().timestamp(),
                        completed: true,
                        orchestrators: report.outcomes.len(),
                        vims_created: totals.created,
                        vims_failed: totals.failed + totals.orphaned,
                    })
                    .await;
            }
            Some(report)
        }
        Err(e) => {
            metrics.inc_sweep_failures();
            reconciler.logger().log_sweep_skipped(&e.to_string());
            if let Some(health) = health {
                health
                    .set_degraded(components::INVENTORY, e.to_string())
                    .await;
                health
                    .record_sweep(SweepSummary {
                        finished_at: chrono::Utc::now().timestamp(),
                        completed: false,
                        orchestrators: 0,
                        vims_created: 0,
                        vims_failed: 0,
                    })
                    .await;
            }
            None
        }
    }
}
