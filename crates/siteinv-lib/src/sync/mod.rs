//! VIM synchronization between OSM orchestrators and the site inventory
//!
//! This module provides:
//! - The per-orchestrator VIM reconciler (lookup, create, link)
//! - The interval scheduler driving full sweeps

mod reconciler;
mod scheduler;


pub use reconciler::{
    vim_account_for, OrchestratorOutcome, SweepReport, VimReconciler, VimSummary, OSM_TYPE,
};
pub use scheduler::{SyncScheduler, DEFAULT_SYNC_INTERVAL};
