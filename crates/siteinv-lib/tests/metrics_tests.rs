//! Sweep metrics against the global registry
//!
//! Kept to a single test: this binary is the only writer of the process-wide
//! counters, so exact values can be asserted.

use mockito::{Matcher, Server};
use serde_json::json;
use siteinv_lib::driver::{async_trait, OrchestratorDriver, OsmVim, VimListing};
use siteinv_lib::sync::VimReconciler;
use siteinv_lib::{DriverCredentials, DriverError, InventoryClient};
use std::sync::Arc;
use std::time::Duration;

struct OneVimDriver;

#[async_trait]
impl OrchestratorDriver for OneVimDriver {
    async fn vim_list(&self, _credentials: &DriverCredentials) -> Result<VimListing, DriverError> {
        Ok(VimListing::new(vec![OsmVim {
            id: "v1".to_string(),
            name: "vim1".to_string(),
            vim_type: "openstack".to_string(),
            vim_url: "http://x".to_string(),
            vim_tenant_name: Some("t1".to_string()),
        }]))
    }
}

#[tokio::test]
async fn test_orphaned_and_malformed_accounting() {
    let mut server = Server::new_async().await;
    let base = server.url();

    let valid = json!({
        "id": 1,
        "name": "osm-1",
        "type": "osm",
        "credentials": { "id": 7, "host": "h", "port": 9999, "username": "u", "password": "p" },
        "_links": {
            "self": { "href": format!("{}/nfvOrchestrators/1", base) },
            "site": { "href": format!("{}/nfvOrchestrators/1/site", base) }
        }
    });
    let broken = json!({ "id": 2, "name": null, "type": "osm" });
    server
        .mock("GET", "/nfvOrchestrators/search/findByTypeIgnoreCase")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({ "_embedded": { "nfvOrchestrators": [valid, broken] } }).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/vimAccounts/search/findByVimAccountNfvoId")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({ "_embedded": { "vimAccounts": [] } }).to_string())
        .create_async()
        .await;
    server
        .mock("POST", "/vimAccounts")
        .with_status(201)
        .with_body(
            json!({
                "vimAccountNfvoId": "v1",
                "_links": {
                    "self": { "href": format!("{}/vimAccounts/10", base) },
                    "nfvOrchestrators": { "href": format!("{}/vimAccounts/10/nfvOrchestrators", base) }
                }
            })
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("PUT", "/vimAccounts/10/nfvOrchestrators")
        .with_status(500)
        .create_async()
        .await;

    let inventory = InventoryClient::with_base_url(&base, Duration::from_secs(5)).unwrap();
    let reconciler = VimReconciler::new(Arc::new(inventory), Arc::new(OneVimDriver));
    let metrics = reconciler.metrics().clone();

    let report = reconciler.sweep().await.unwrap();

    let totals = report.totals();
    assert_eq!(totals.created, 0);
    assert_eq!(totals.orphaned, 1);
    assert_eq!(metrics.vims_created(), 0, "orphans must not count as created");
    assert_eq!(metrics.vim_link_failures(), 1);
    assert_eq!(metrics.malformed_records(), 1);
}
