//! Observability infrastructure for the sync adapter
//!
//! Provides:
//! - Prometheus metrics (sweep counts and latency, VIM create/skip/fail counts)
//! - Structured JSON logging with tracing

use prometheus::{register_histogram, register_int_counter, Histogram, IntCounter};
use std::sync::OnceLock;
use tracing::{error, info, warn};

/// Histogram buckets for sweep duration (in seconds)
const SWEEP_BUCKETS: &[f64] = &[0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<SyncMetricsInner> = OnceLock::new();

struct SyncMetricsInner {
    sweeps: IntCounter,
    sweep_failures: IntCounter,
    sweep_duration_seconds: Histogram,
    orchestrators_reconciled: IntCounter,
    driver_errors: IntCounter,
    vims_created: IntCounter,
    vims_skipped: IntCounter,
    vim_errors: IntCounter,
    vim_link_failures: IntCounter,
    malformed_records: IntCounter,
}

impl SyncMetricsInner {
    fn new() -> Self {
        Self {
            sweeps: register_int_counter!(
                "siteinv_sweeps_total",
                "Reconciliation sweeps started"
            )
            .expect("Failed to register sweeps_total"),

            sweep_failures: register_int_counter!(
                "siteinv_sweep_failures_total",
                "Sweeps aborted because orchestrators could not be enumerated"
            )
            .expect("Failed to register sweep_failures_total"),

            sweep_duration_seconds: register_histogram!(
                "siteinv_sweep_duration_seconds",
                "Wall time of a full reconciliation sweep",
                SWEEP_BUCKETS.to_vec()
            )
            .expect("Failed to register sweep_duration_seconds"),

            orchestrators_reconciled: register_int_counter!(
                "siteinv_orchestrators_reconciled_total",
                "Orchestrators whose VIM list was fetched and reconciled"
            )
            .expect("Failed to register orchestrators_reconciled_total"),

            driver_errors: register_int_counter!(
                "siteinv_driver_errors_total",
                "Orchestrators skipped because the driver call failed"
            )
            .expect("Failed to register driver_errors_total"),

            vims_created: register_int_counter!(
                "siteinv_vims_created_total",
                "VIM accounts created in the inventory and linked to their orchestrator"
            )
            .expect("Failed to register vims_created_total"),

            vims_skipped: register_int_counter!(
                "siteinv_vims_skipped_total",
                "VIM accounts already present in the inventory"
            )
            .expect("Failed to register vims_skipped_total"),

            vim_errors: register_int_counter!(
                "siteinv_vim_errors_total",
                "VIM accounts whose lookup or creation failed"
            )
            .expect("Failed to register vim_errors_total"),

            vim_link_failures: register_int_counter!(
                "siteinv_vim_link_failures_total",
                "VIM accounts created but not linked to their orchestrator"
            )
            .expect("Failed to register vim_link_failures_total"),

            malformed_records: register_int_counter!(
                "siteinv_malformed_orchestrators_total",
                "Orchestrator records skipped because they could not be decoded"
            )
            .expect("Failed to register malformed_orchestrators_total"),
        }
    }
}

/// Sync metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share it.
#[derive(Clone)]
pub struct SyncMetrics {
    inner: &'static SyncMetricsInner,
}

impl Default for SyncMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncMetrics {
    pub fn new() -> Self {
        Self {
            inner: GLOBAL_METRICS.get_or_init(SyncMetricsInner::new),
        }
    }

    pub fn inc_sweeps(&self) {
        self.inner.sweeps.inc();
    }

    pub fn inc_sweep_failures(&self) {
        self.inner.sweep_failures.inc();
    }

    pub fn observe_sweep_duration(&self, duration_secs: f64) {
        self.inner.sweep_duration_seconds.observe(duration_secs);
    }

    pub fn inc_orchestrators_reconciled(&self) {
        self.inner.orchestrators_reconciled.inc();
    }

    pub fn inc_driver_errors(&self) {
        self.inner.driver_errors.inc();
    }

    pub fn inc_vims_created(&self) {
        self.inner.vims_created.inc();
    }

    pub fn inc_vims_skipped(&self) {
        self.inner.vims_skipped.inc();
    }

    pub fn inc_vim_errors(&self) {
        self.inner.vim_errors.inc();
    }

    pub fn inc_vim_link_failures(&self) {
        self.inner.vim_link_failures.inc();
    }

    pub fn inc_malformed_records(&self) {
        self.inner.malformed_records.inc();
    }

    pub fn sweeps(&self) -> u64 {
        self.inner.sweeps.get()
    }

    /// Accounts both created and linked; orphans are counted separately
    pub fn vims_created(&self) -> u64 {
        self.inner.vims_created.get()
    }

    pub fn vim_link_failures(&self) -> u64 {
        self.inner.vim_link_failures.get()
    }

    pub fn malformed_records(&self) -> u64 {
        self.inner.malformed_records.get()
    }
}

/// Structured logger for sync events
///
/// Emits event-tagged lines that downstream log pipelines can filter on.
#[derive(Clone)]
pub struct StructuredLogger {
    inventory: String,
}

impl StructuredLogger {
    pub fn new(inventory: impl Into<String>) -> Self {
        Self {
            inventory: inventory.into(),
        }
    }

    pub fn log_startup(&self, version: &str, interval_secs: u64) {
        info!(
            event = "adapter_started",
            inventory = %self.inventory,
            version = %version,
            interval_secs = interval_secs,
            "Site inventory sync started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "adapter_shutdown",
            inventory = %self.inventory,
            reason = %reason,
            "Site inventory sync shutting down"
        );
    }

    pub fn log_sweep_complete(
        &self,
        orchestrators: usize,
        created: usize,
        existing: usize,
        failed: usize,
        elapsed_ms: u128,
    ) {
        info!(
            event = "sweep_complete",
            inventory = %self.inventory,
            orchestrators = orchestrators,
            vims_created = created,
            vims_existing = existing,
            vims_failed = failed,
            elapsed_ms = elapsed_ms,
            "Reconciliation sweep complete"
        );
    }

    pub fn log_sweep_skipped(&self, error: &str) {
        warn!(
            event = "sweep_skipped",
            inventory = %self.inventory,
            error = %error,
            "Error with site inventory, skipping VIM reconciliation"
        );
    }

    pub fn log_driver_failure(&self, nfvo_id: i64, host: &str, port: u16, error: &str) {
        warn!(
            event = "driver_failure",
            inventory = %self.inventory,
            nfvo_id = nfvo_id,
            host = %host,
            port = port,
            error = %error,
            "Error contacting orchestrator, skipping it"
        );
    }

    /// A VIM account exists in the inventory but is not linked to its owner
    pub fn log_orphaned_vim(&self, nfvo_id: i64, native_id: &str, vim_href: Option<&str>, error: &str) {
        error!(
            event = "vim_orphaned",
            inventory = %self.inventory,
            nfvo_id = nfvo_id,
            vim_account_nfvo_id = %native_id,
            vim_href = ?vim_href,
            error = %error,
            "Created vimAccount could not be linked to its orchestrator"
        );
    }
}
