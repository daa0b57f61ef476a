//! Site inventory adapter CLI
//!
//! A command-line tool for querying orchestrators, managing subscriptions
//! and running one-off VIM reconciliation sweeps.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{orchestrators, subscriptions, sync};
use siteinv_lib::{InventoryClient, InventoryConfig, InventoryService};
use std::sync::Arc;
use std::time::Duration;

/// Site inventory adapter CLI
#[derive(Parser)]
#[command(name = "siteinv")]
#[command(author, version, about = "CLI for the Site Inventory OSM adapter", long_about = None)]
pub struct Cli {
    /// Site inventory host
    #[arg(long, env = "SITEINV_HOST", default_value = "localhost")]
    pub host: String,

    /// Site inventory port
    #[arg(long, env = "SITEINV_PORT", default_value_t = 8087)]
    pub port: u16,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Query NFV orchestrators
    #[command(subcommand)]
    Orchestrators(OrchestratorCommands),

    /// Manage orchestrator subscriptions
    #[command(subcommand)]
    Subscriptions(SubscriptionCommands),

    /// Run one VIM reconciliation sweep against every OSM orchestrator
    Sync {
        /// OSM project used when requesting tokens
        #[arg(long, default_value = "admin")]
        osm_project: String,
    },
}

#[derive(Subcommand)]
pub enum OrchestratorCommands {
    /// List all orchestrators
    List,

    /// Show one orchestrator
    Get {
        /// Orchestrator ID
        id: i64,
    },

    /// Show the credentials stored for an orchestrator
    Credentials {
        /// Orchestrator ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum SubscriptionCommands {
    /// List subscriptions of an orchestrator
    List {
        /// Orchestrator ID
        nfvo_id: i64,
    },

    /// Show one subscription
    Get {
        /// Orchestrator ID
        nfvo_id: i64,
        /// Subscription ID
        id: i64,
    },

    /// Create a subscription and link it to an orchestrator
    Create {
        /// Orchestrator ID
        nfvo_id: i64,

        /// URI notifications are delivered to
        #[arg(long)]
        callback_uri: String,

        /// Restrict notifications to one NS instance
        #[arg(long)]
        ns_instance_id: Option<String>,

        /// Notification type to subscribe to (repeatable)
        #[arg(long = "notification-type")]
        notification_types: Vec<String>,
    },

    /// Delete a subscription
    Delete {
        /// Subscription ID
        id: i64,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    let config = InventoryConfig {
        host: cli.host.clone(),
        port: cli.port,
        request_timeout: Duration::from_secs(cli.timeout),
    };
    let client = Arc::new(InventoryClient::new(&config)?);
    tracing::debug!(base_url = %client.base_url(), "Using site inventory");
    let service = InventoryService::new(client.clone());

    match cli.command {
        Commands::Orchestrators(cmd) => match cmd {
            OrchestratorCommands::List => {
                orchestrators::list_orchestrators(&service, cli.format).await?;
            }
            OrchestratorCommands::Get { id } => {
                orchestrators::get_orchestrator(&service, id, cli.format).await?;
            }
            OrchestratorCommands::Credentials { id } => {
                orchestrators::get_credentials(&service, id, cli.format).await?;
            }
        },
        Commands::Subscriptions(cmd) => match cmd {
            SubscriptionCommands::List { nfvo_id } => {
                subscriptions::list_subscriptions(&service, nfvo_id, cli.format).await?;
            }
            SubscriptionCommands::Get { nfvo_id, id } => {
                subscriptions::get_subscription(&service, nfvo_id, id, cli.format).await?;
            }
            SubscriptionCommands::Create {
                nfvo_id,
                callback_uri,
                ns_instance_id,
                notification_types,
            } => {
                subscriptions::create_subscription(
                    &service,
                    nfvo_id,
                    callback_uri,
                    ns_instance_id,
                    notification_types,
                    cli.format,
                )
                .await?;
            }
            SubscriptionCommands::Delete { id } => {
                subscriptions::delete_subscription(&service, id).await?;
            }
        },
        Commands::Sync { osm_project } => {
            sync::run_sweep(client, &osm_project, cli.timeout, cli.format).await?;
        }
    }

    Ok(())
}
