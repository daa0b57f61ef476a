//! Orchestrator query commands

use anyhow::Result;
use siteinv_lib::{DriverCredentials, InventoryService, Orchestrator};
use tabled::Tabled;

use crate::output::{color_kind, mask_secret, or_dash, print_json, print_rows, OutputFormat};

/// Row for orchestrators table
#[derive(Tabled)]
struct OrchestratorRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Site")]
    site: String,
    #[tabled(rename = "URI")]
    uri: String,
    #[tabled(rename = "Updated")]
    updated_at: String,
}

impl From<&Orchestrator> for OrchestratorRow {
    fn from(o: &Orchestrator) -> Self {
        Self {
            id: o.id,
            name: o.name.clone(),
            kind: color_kind(&o.kind),
            site: o.site.clone(),
            uri: or_dash(o.uri.as_deref()),
            updated_at: or_dash(o.updated_at.as_deref()),
        }
    }
}

/// Row for credentials table
#[derive(Tabled)]
struct CredentialsRow {
    #[tabled(rename = "NFVO")]
    nfvo_id: i64,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Port")]
    port: u16,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Password")]
    password: String,
}

impl From<&DriverCredentials> for CredentialsRow {
    fn from(c: &DriverCredentials) -> Self {
        Self {
            nfvo_id: c.nfvo_id,
            host: c.host.clone(),
            port: c.port,
            user: c.user.clone(),
            password: mask_secret(&c.password),
        }
    }
}

pub async fn list_orchestrators(service: &InventoryService, format: OutputFormat) -> Result<()> {
    let orchestrators = service.list_orchestrators().await?;
    let rows = orchestrators.iter().map(OrchestratorRow::from).collect();
    print_rows(rows, &orchestrators, format, "No orchestrators found")
}

pub async fn get_orchestrator(
    service: &InventoryService,
    id: i64,
    format: OutputFormat,
) -> Result<()> {
    let orchestrator = service.get_orchestrator_by_id(id).await?;

    match format {
        OutputFormat::Json => print_json(&orchestrator)?,
        OutputFormat::Table => {
            println!("Orchestrator: {}", orchestrator.id);
            println!("  Name:    {}", orchestrator.name);
            println!("  Type:    {}", color_kind(&orchestrator.kind));
            println!("  Site:    {}", orchestrator.site);
            println!("  URI:     {}", or_dash(orchestrator.uri.as_deref()));
            println!("  Created: {}", or_dash(orchestrator.created_at.as_deref()));
            println!("  Updated: {}", or_dash(orchestrator.updated_at.as_deref()));
        }
    }

    Ok(())
}

/// The password is masked in table output and shown as is in JSON
pub async fn get_credentials(service: &InventoryService, id: i64, format: OutputFormat) -> Result<()> {
    let credentials = service.get_orchestrator_credentials(id).await?;
    let rows = vec![CredentialsRow::from(&credentials)];
    print_rows(rows, &credentials, format, "No credentials found")
}
