//! Site inventory sync agent
//!
//! Long-running daemon that keeps the site inventory's VIM accounts in
//! line with every registered OSM orchestrator.

use anyhow::Result;
use siteinv_lib::{
    driver::OsmDriver,
    health::components,
    sync::{SyncScheduler, VimReconciler},
    HealthRegistry, InventoryClient,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;

const AGENT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    let config = config::AgentConfig::load()?;
    info!(
        host = %config.host,
        port = config.port,
        interval_secs = config.interval,
        "Agent configured"
    );

    let inventory = Arc::new(InventoryClient::new(&config.inventory())?);
    let driver = Arc::new(OsmDriver::new(config.osm_driver())?);
    let reconciler = Arc::new(VimReconciler::new(inventory, driver));

    let health_registry = HealthRegistry::new();
    health_registry.register(components::INVENTORY).await;

    let metrics = reconciler.metrics().clone();
    let logger = reconciler.logger().clone();
    logger.log_startup(AGENT_VERSION, config.interval);

    let app_state = Arc::new(api::AppState::new(health_registry.clone(), metrics));
    let api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    let mut scheduler =
        SyncScheduler::new(reconciler, config.interval()).with_health(health_registry);
    scheduler.start();

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            logger.log_shutdown("SIGINT received");
        }
        result = api_handle => {
            match result {
                Ok(Err(e)) => error!(error = %e, "API server failed"),
                Err(e) => error!(error = %e, "API server task panicked"),
                Ok(Ok(())) => {}
            }
            logger.log_shutdown("API server stopped");
        }
    }

    scheduler.stop().await;
    info!("Shutting down");

    Ok(())
}
