//! Query and admin operations over orchestrators and subscriptions
//!
//! Thin translations over [`InventoryClient`]: raw inventory records are
//! normalized into the public shapes and errors propagate to the caller.

use crate::error::InventoryError;
use crate::inventory::InventoryClient;
use crate::models::{
    DriverCredentials, Orchestrator, OrchestratorRecord, Subscription, SubscriptionRequest,
};
use std::sync::Arc;

type Result<T> = std::result::Result<T, InventoryError>;

#[derive(Debug, Clone)]
pub struct InventoryService {
    client: Arc<InventoryClient>,
}

impl InventoryService {
    pub fn new(client: Arc<InventoryClient>) -> Self {
        Self { client }
    }

    /// Resolve the site name behind the record's `site` link
    async fn normalize(&self, record: OrchestratorRecord) -> Result<Orchestrator> {
        let href = record
            .links
            .site
            .as_ref()
            .map(|link| link.href.clone())
            .ok_or_else(|| {
                InventoryError::service(format!("orchestrator {} has no site link", record.id))
            })?;
        let site = self.client.get_site(&href).await?;
        Ok(Orchestrator::from_record(record, site.name))
    }

    pub async fn get_orchestrator_by_id(&self, nfvo_id: i64) -> Result<Orchestrator> {
        let record = self.client.get_orchestrator(nfvo_id).await?;
        self.normalize(record).await
    }

    /// Credentials in driver shape; `CredentialsNotFound` when none are stored
    pub async fn get_orchestrator_credentials(&self, nfvo_id: i64) -> Result<DriverCredentials> {
        self.client
            .get_orchestrator(nfvo_id)
            .await?
            .driver_credentials()
            .ok_or(InventoryError::CredentialsNotFound { id: nfvo_id })
    }

    pub async fn list_orchestrators(&self) -> Result<Vec<Orchestrator>> {
        let records = self.client.list_orchestrators().await?;
        let mut orchestrators = Vec::with_capacity(records.len());
        for record in records {
            orchestrators.push(self.normalize(record).await?);
        }
        Ok(orchestrators)
    }

    pub async fn list_subscriptions(&self, nfvo_id: i64) -> Result<Vec<Subscription>> {
        self.client.list_subscriptions(nfvo_id).await
    }

    pub async fn create_subscription(
        &self,
        nfvo_id: i64,
        body: &SubscriptionRequest,
    ) -> Result<Subscription> {
        self.client.create_subscription(nfvo_id, body).await
    }

    pub async fn get_subscription(&self, nfvo_id: i64, subscription_id: i64) -> Result<Subscription> {
        self.client.get_subscription(nfvo_id, subscription_id).await
    }

    pub async fn delete_subscription(&self, subscription_id: i64) -> Result<()> {
        self.client.delete_subscription(subscription_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use serde_json::{json, Value};
    use std::time::Duration;

    fn service_for(server: &Server) -> InventoryService {
        let client = InventoryClient::with_base_url(&server.url(), Duration::from_secs(5)).unwrap();
        InventoryService::new(Arc::new(client))
    }

    fn orchestrator_json(base: &str, id: i64, credentials: Value) -> Value {
        json!({
            "id": id,
            "name": format!("osm-{}", id),
            "type": "osm",
            "uri": "http://osm",
            "createdAt": null,
            "updatedAt": "2020-01-01T00:00:00.000+0000",
            "credentials": credentials,
            "_links": {
                "self": { "href": format!("{}/nfvOrchestrators/{}", base, id) },
                "site": { "href": format!("{}/nfvOrchestrators/{}/site", base, id) }
            }
        })
    }

    #[tokio::test]
    async fn test_get_orchestrator_resolves_site() {
        let mut server = Server::new_async().await;
        let base = server.url();
        server
            .mock("GET", "/nfvOrchestrators/1")
            .with_status(200)
            .with_body(orchestrator_json(&base, 1, Value::Null).to_string())
            .create_async()
            .await;
        let site = server
            .mock("GET", "/nfvOrchestrators/1/site")
            .with_status(200)
            .with_body(json!({ "name": "turin" }).to_string())
            .expect(1)
            .create_async()
            .await;

        let orchestrator = service_for(&server).get_orchestrator_by_id(1).await.unwrap();

        site.assert_async().await;
        assert_eq!(orchestrator.site, "turin");
        assert_eq!(orchestrator.uri.as_deref(), Some("http://osm"));
        assert!(orchestrator.created_at.is_none());
    }

    #[tokio::test]
    async fn test_get_orchestrator_not_found() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/nfvOrchestrators/3")
            .with_status(404)
            .create_async()
            .await;

        let err = service_for(&server).get_orchestrator_by_id(3).await.unwrap_err();

        assert!(matches!(err, InventoryError::OrchestratorNotFound { id: 3 }));
    }

    #[tokio::test]
    async fn test_credentials_not_found() {
        let mut server = Server::new_async().await;
        let base = server.url();
        server
            .mock("GET", "/nfvOrchestrators/5")
            .with_status(200)
            .with_body(orchestrator_json(&base, 5, Value::Null).to_string())
            .create_async()
            .await;

        let err = service_for(&server)
            .get_orchestrator_credentials(5)
            .await
            .unwrap_err();

        assert!(matches!(err, InventoryError::CredentialsNotFound { id: 5 }));
    }

    #[tokio::test]
    async fn test_credentials_are_converted() {
        let mut server = Server::new_async().await;
        let base = server.url();
        let credentials = json!({
            "id": 9,
            "host": "10.0.0.1",
            "port": 443,
            "username": "admin",
            "password": "secret"
        });
        server
            .mock("GET", "/nfvOrchestrators/2")
            .with_status(200)
            .with_body(orchestrator_json(&base, 2, credentials).to_string())
            .create_async()
            .await;

        let creds = service_for(&server)
            .get_orchestrator_credentials(2)
            .await
            .unwrap();

        assert_eq!(
            creds,
            DriverCredentials {
                host: "10.0.0.1".to_string(),
                port: 443,
                user: "admin".to_string(),
                password: "secret".to_string(),
                nfvo_id: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_list_orchestrators() {
        let mut server = Server::new_async().await;
        let base = server.url();
        server
            .mock("GET", "/nfvOrchestrators")
            .with_status(200)
            .with_body(
                json!({
                    "_embedded": {
                        "nfvOrchestrators": [
                            orchestrator_json(&base, 1, Value::Null),
                            orchestrator_json(&base, 2, Value::Null)
                        ]
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;
        for id in [1, 2] {
            server
                .mock("GET", format!("/nfvOrchestrators/{}/site", id).as_str())
                .with_status(200)
                .with_body(json!({ "name": format!("site-{}", id) }).to_string())
                .create_async()
                .await;
        }

        let orchestrators = service_for(&server).list_orchestrators().await.unwrap();

        let sites: Vec<_> = orchestrators.iter().map(|o| o.site.as_str()).collect();
        assert_eq!(sites, vec!["site-1", "site-2"]);
    }

    #[tokio::test]
    async fn test_list_orchestrators_unauthorized() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/nfvOrchestrators")
            .with_status(401)
            .create_async()
            .await;

        let err = service_for(&server).list_orchestrators().await.unwrap_err();

        assert!(matches!(err, InventoryError::Unauthorized));
    }

    #[tokio::test]
    async fn test_delete_subscription_not_found() {
        let mut server = Server::new_async().await;
        server
            .mock("DELETE", "/subscriptions/42")
            .with_status(404)
            .create_async()
            .await;

        let err = service_for(&server).delete_subscription(42).await.unwrap_err();

        assert!(matches!(err, InventoryError::SubscriptionNotFound { sub_id: 42 }));
    }
}
