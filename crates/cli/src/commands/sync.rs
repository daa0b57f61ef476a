//! One-off reconciliation sweep

use anyhow::Result;
use colored::Colorize;
use siteinv_lib::driver::{OsmDriver, OsmDriverConfig};
use siteinv_lib::sync::{OrchestratorOutcome, SweepReport, VimReconciler};
use siteinv_lib::InventoryClient;
use std::sync::Arc;
use std::time::Duration;
use tabled::Tabled;

use crate::output::{print_json, print_success, print_warning, OutputFormat};

/// Row for the sweep report table
#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "NFVO")]
    nfvo_id: String,
    #[tabled(rename = "Result")]
    result: String,
    #[tabled(rename = "Created")]
    created: usize,
    #[tabled(rename = "Existing")]
    existing: usize,
    #[tabled(rename = "Failed")]
    failed: usize,
    #[tabled(rename = "Orphaned")]
    orphaned: usize,
}

impl From<&OrchestratorOutcome> for OutcomeRow {
    fn from(outcome: &OrchestratorOutcome) -> Self {
        let (result, vims) = match outcome {
            OrchestratorOutcome::SkippedNoCredentials { .. } => {
                ("no credentials".yellow().to_string(), Default::default())
            }
            OrchestratorOutcome::Malformed { error, .. } => {
                (format!("{}: {}", "malformed record".red(), error), Default::default())
            }
            OrchestratorOutcome::DriverFailed { error, .. } => {
                (format!("{}: {}", "driver error".red(), error), Default::default())
            }
            OrchestratorOutcome::Reconciled { vims, .. } => ("reconciled".green().to_string(), *vims),
        };
        Self {
            nfvo_id: outcome
                .nfvo_id()
                .map_or_else(|| "-".to_string(), |id| id.to_string()),
            result,
            created: vims.created,
            existing: vims.existing,
            failed: vims.failed,
            orphaned: vims.orphaned,
        }
    }
}

/// Run a single sweep against the real OSM driver and print the report
pub async fn run_sweep(
    inventory: Arc<InventoryClient>,
    osm_project: &str,
    timeout_secs: u64,
    format: OutputFormat,
) -> Result<()> {
    let driver = OsmDriver::new(OsmDriverConfig {
        project_id: osm_project.to_string(),
        request_timeout: Duration::from_secs(timeout_secs),
        ..OsmDriverConfig::default()
    })?;
    let reconciler = VimReconciler::new(inventory, Arc::new(driver));

    let report = reconciler.sweep().await?;

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => print_report(&report),
    }

    Ok(())
}

fn print_report(report: &SweepReport) {
    if report.outcomes.is_empty() {
        print_warning("No OSM orchestrators registered");
        return;
    }

    let rows: Vec<OutcomeRow> = report.outcomes.iter().map(OutcomeRow::from).collect();
    let table = tabled::Table::new(rows)
        .with(tabled::settings::Style::rounded())
        .to_string();
    println!("{}", table);

    let totals = report.totals();
    let summary = format!(
        "Sweep complete: {} created, {} existing, {} failed",
        totals.created, totals.existing, totals.failed
    );
    if totals.failed == 0 && totals.orphaned == 0 {
        print_success(&summary);
    } else {
        print_warning(&summary);
    }
    if totals.orphaned > 0 {
        print_warning(&format!(
            "{} VIM account(s) created without an orchestrator link",
            totals.orphaned
        ));
    }
}
