//! Subscription management commands

use anyhow::Result;
use siteinv_lib::{InventoryService, Subscription, SubscriptionRequest};
use tabled::Tabled;

use crate::output::{or_dash, print_json, print_rows, print_success, OutputFormat};

/// Row for subscriptions table
#[derive(Tabled)]
struct SubscriptionRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Callback URI")]
    callback_uri: String,
    #[tabled(rename = "NS Instance")]
    ns_instance_id: String,
    #[tabled(rename = "Notification Types")]
    notification_types: String,
}

impl From<&Subscription> for SubscriptionRow {
    fn from(s: &Subscription) -> Self {
        let notification_types = if s.notification_types.is_empty() {
            "-".to_string()
        } else {
            s.notification_types.join(", ")
        };
        Self {
            id: s.id,
            callback_uri: s.callback_uri.clone(),
            ns_instance_id: or_dash(s.ns_instance_id.as_deref()),
            notification_types,
        }
    }
}

pub async fn list_subscriptions(
    service: &InventoryService,
    nfvo_id: i64,
    format: OutputFormat,
) -> Result<()> {
    let subscriptions = service.list_subscriptions(nfvo_id).await?;
    let rows = subscriptions.iter().map(SubscriptionRow::from).collect();
    print_rows(
        rows,
        &subscriptions,
        format,
        &format!("No subscriptions found for orchestrator {}", nfvo_id),
    )
}

pub async fn get_subscription(
    service: &InventoryService,
    nfvo_id: i64,
    id: i64,
    format: OutputFormat,
) -> Result<()> {
    let subscription = service.get_subscription(nfvo_id, id).await?;
    let rows = vec![SubscriptionRow::from(&subscription)];
    print_rows(rows, &subscription, format, "No subscription found")
}

pub async fn create_subscription(
    service: &InventoryService,
    nfvo_id: i64,
    callback_uri: String,
    ns_instance_id: Option<String>,
    notification_types: Vec<String>,
    format: OutputFormat,
) -> Result<()> {
    let request = SubscriptionRequest {
        callback_uri,
        ns_instance_id,
        notification_types,
    };
    let subscription = service.create_subscription(nfvo_id, &request).await?;

    match format {
        OutputFormat::Json => print_json(&subscription)?,
        OutputFormat::Table => {
            print_success(&format!(
                "Subscription {} created for orchestrator {}",
                subscription.id, nfvo_id
            ));
            println!("Callback URI: {}", subscription.callback_uri);
        }
    }

    Ok(())
}

pub async fn delete_subscription(service: &InventoryService, id: i64) -> Result<()> {
    service.delete_subscription(id).await?;
    print_success(&format!("Subscription {} deleted", id));
    Ok(())
}
