//! Per-orchestrator VIM reconciliation
//!
//! For every OSM orchestrator with credentials, the orchestrator's VIM list
//! is fetched through the driver and each VIM missing from the inventory is
//! created and then linked to the orchestrator.
//!
//! Deduplication relies on the lookup by native id only. Two adapters
//! sweeping at the same time can both miss the lookup and both create.

use crate::driver::{OrchestratorDriver, OsmVim};
use crate::error::InventoryError;
use crate::inventory::InventoryClient;
use crate::models::{OrchestratorRecord, VimAccount};
use crate::observability::{StructuredLogger, SyncMetrics};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Orchestrator type taking part in reconciliation
pub const OSM_TYPE: &str = "osm";

/// Per-orchestrator VIM counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VimSummary {
    pub created: usize,
    pub existing: usize,
    pub failed: usize,
    /// Created but the link to the orchestrator failed
    pub orphaned: usize,
}

impl VimSummary {
    fn record(&mut self, outcome: VimOutcome) {
        match outcome {
            VimOutcome::Created => self.created += 1,
            VimOutcome::Existing => self.existing += 1,
            VimOutcome::Failed => self.failed += 1,
            VimOutcome::Orphaned => self.orphaned += 1,
        }
    }

    fn merge(&mut self, other: &VimSummary) {
        self.created += other.created;
        self.existing += other.existing;
        self.failed += other.failed;
        self.orphaned += other.orphaned;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OrchestratorOutcome {
    /// No credentials configured yet; nothing was contacted
    SkippedNoCredentials { nfvo_id: i64 },
    /// The inventory entry could not be decoded; `nfvo_id` is its raw id if any
    Malformed { nfvo_id: Option<i64>, error: String },
    DriverFailed { nfvo_id: i64, error: String },
    Reconciled { nfvo_id: i64, vims: VimSummary },
}

impl OrchestratorOutcome {
    pub fn nfvo_id(&self) -> Option<i64> {
        match self {
            Self::SkippedNoCredentials { nfvo_id }
            | Self::DriverFailed { nfvo_id, .. }
            | Self::Reconciled { nfvo_id, .. } => Some(*nfvo_id),
            Self::Malformed { nfvo_id, .. } => *nfvo_id,
        }
    }
}

/// Result of one sweep over every OSM orchestrator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub outcomes: Vec<OrchestratorOutcome>,
}

impl SweepReport {
    /// VIM counts summed over reconciled orchestrators
    pub fn totals(&self) -> VimSummary {
        let mut totals = VimSummary::default();
        for outcome in &self.outcomes {
            if let OrchestratorOutcome::Reconciled { vims, .. } = outcome {
                totals.merge(vims);
            }
        }
        totals
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VimOutcome {
    Created,
    Existing,
    Failed,
    Orphaned,
}

/// Inventory payload for a VIM reported by OSM
pub fn vim_account_for(vim: &OsmVim) -> VimAccount {
    VimAccount {
        vim_account_nfvo_id: vim.id.clone(),
        name: vim.name.clone(),
        kind: vim.vim_type.clone(),
        uri: vim.vim_url.clone(),
        tenant: vim.vim_tenant_name.clone(),
    }
}

/// Brings the inventory's VIM accounts up to date with each orchestrator
pub struct VimReconciler {
    inventory: Arc<InventoryClient>,
    driver: Arc<dyn OrchestratorDriver>,
    metrics: SyncMetrics,
    logger: StructuredLogger,
}

impl VimReconciler {
    pub fn new(inventory: Arc<InventoryClient>, driver: Arc<dyn OrchestratorDriver>) -> Self {
        let logger = StructuredLogger::new(inventory.base_url().as_str());
        Self {
            inventory,
            driver,
            metrics: SyncMetrics::new(),
            logger,
        }
    }

    pub fn metrics(&self) -> &SyncMetrics {
        &self.metrics
    }

    pub fn logger(&self) -> &StructuredLogger {
        &self.logger
    }

    /// Reconcile every OSM orchestrator.
    ///
    /// Only the enumeration step can fail the sweep; undecodable records,
    /// per-orchestrator and per-VIM failures are logged and reported in the
    /// outcomes.
    pub async fn sweep(&self) -> Result<SweepReport, InventoryError> {
        let entries = self.inventory.find_orchestrators_by_type(OSM_TYPE).await?;
        debug!(count = entries.len(), "Enumerated OSM orchestrators");

        let mut report = SweepReport::default();
        for entry in entries {
            let outcome = match entry {
                Ok(orchestrator) => self.reconcile_orchestrator(&orchestrator).await,
                Err(malformed) => {
                    self.metrics.inc_malformed_records();
                    warn!(
                        nfvo_id = ?malformed.id,
                        error = %malformed.error,
                        "Skipping undecodable orchestrator record"
                    );
                    OrchestratorOutcome::Malformed {
                        nfvo_id: malformed.id,
                        error: malformed.error,
                    }
                }
            };
            report.outcomes.push(outcome);
        }
        Ok(report)
    }

    /// Reconcile the VIM list of a single orchestrator
    pub async fn reconcile_orchestrator(&self, orchestrator: &OrchestratorRecord) -> OrchestratorOutcome {
        let nfvo_id = orchestrator.id;
        let Some(credentials) = orchestrator.driver_credentials() else {
            debug!(nfvo_id = nfvo_id, "Orchestrator has no credentials, skipping");
            return OrchestratorOutcome::SkippedNoCredentials { nfvo_id };
        };

        let listing = match self.driver.vim_list(&credentials).await {
            Ok(listing) => listing,
            Err(e) => {
                self.metrics.inc_driver_errors();
                self.logger.log_driver_failure(
                    nfvo_id,
                    &credentials.host,
                    credentials.port,
                    &e.to_string(),
                );
                return OrchestratorOutcome::DriverFailed {
                    nfvo_id,
                    error: e.to_string(),
                };
            }
        };

        let mut vims = VimSummary::default();
        for vim in &listing.vims {
            let outcome = self.reconcile_vim(nfvo_id, vim, orchestrator.self_href()).await;
            vims.record(outcome);
        }

        self.metrics.inc_orchestrators_reconciled();
        OrchestratorOutcome::Reconciled { nfvo_id, vims }
    }

    async fn reconcile_vim(&self, nfvo_id: i64, vim: &OsmVim, owner_href: &str) -> VimOutcome {
        match self.inventory.find_vim_by_native_id(&vim.id).await {
            Ok(Some(_)) => {
                info!(vim_id = %vim.id, "VIM found in site inventory, skip");
                self.metrics.inc_vims_skipped();
                return VimOutcome::Existing;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(nfvo_id = nfvo_id, vim_id = %vim.id, error = %e, "VIM lookup failed");
                self.metrics.inc_vim_errors();
                return VimOutcome::Failed;
            }
        }

        let created = match self.inventory.create_vim(&vim_account_for(vim)).await {
            Ok(created) => created,
            Err(e) => {
                warn!(nfvo_id = nfvo_id, vim_id = %vim.id, error = %e, "VIM creation failed");
                self.metrics.inc_vim_errors();
                return VimOutcome::Failed;
            }
        };

        // No rollback: a failed link leaves the account in the inventory
        match self
            .inventory
            .link_vim_to_orchestrator(created.owner_link(), owner_href)
            .await
        {
            Ok(()) => {
                self.metrics.inc_vims_created();
                VimOutcome::Created
            }
            Err(e) => {
                self.metrics.inc_vim_link_failures();
                self.logger
                    .log_orphaned_vim(nfvo_id, &vim.id, created.self_href(), &e.to_string());
                VimOutcome::Orphaned
            }
        }
    }
}
