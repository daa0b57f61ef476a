//! HTTP client for the site inventory

use super::{paths, URI_LIST};
use crate::error::{classify_status, InventoryError, Target};
use crate::models::{
    HalCollection, OrchestratorEntry, OrchestratorRecord, SiteRecord, Subscription, SubscriptionRecord,
    SubscriptionRequest, VimAccount, VimAccountRecord,
};
use reqwest::{header, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

type Result<T> = std::result::Result<T, InventoryError>;

/// Connection settings for the inventory service
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// Inventory host name (default: localhost)
    pub host: String,
    /// Inventory port (default: 8087)
    pub port: u16,
    /// Per-request timeout, the only bound on a hung call
    pub request_timeout: Duration,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8087,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl InventoryConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }
}

/// Typed wrapper over the inventory REST API
#[derive(Debug, Clone)]
pub struct InventoryClient {
    client: Client,
    base_url: Url,
}

impl InventoryClient {
    /// Create a client for the configured host and port
    pub fn new(config: &InventoryConfig) -> Result<Self> {
        Self::with_base_url(&config.base_url(), config.request_timeout)
    }

    /// Create a client rooted at an explicit base URL
    pub fn with_base_url(base_url: &str, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(request_timeout).build()?;

        let mut base_url = Url::parse(base_url)?;
        // Url::join drops the last segment unless the base ends with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URI of an orchestrator resource, as written into association bodies
    pub fn orchestrator_uri(&self, nfvo_id: i64) -> String {
        format!("{}{}/{}", self.base_url, paths::NFV_ORCHESTRATORS, nfvo_id)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Send a request and check its status. All calls funnel through here.
    async fn send(&self, request: RequestBuilder, target: Target) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();

        debug!(url = %response.url(), status = %status, "Site inventory response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, &body, target))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| InventoryError::service(format!("invalid response body (HTTP {status}): {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, target: Target) -> Result<T> {
        let response = self.send(self.client.get(url), target).await?;
        Self::decode(response).await
    }

    /// Associate a freshly created resource with its owning orchestrator
    async fn link_to_orchestrator(
        &self,
        link_ref: &str,
        orchestrator_ref: &str,
        target: Target,
    ) -> Result<()> {
        let url = Url::parse(link_ref)?;
        let request = self
            .client
            .put(url)
            .header(header::CONTENT_TYPE, URI_LIST)
            .body(orchestrator_ref.to_string());
        self.send(request, target).await?;
        Ok(())
    }

    /// Orchestrators of the given type, matched case-insensitively.
    ///
    /// Entries are decoded one by one, so a single malformed record comes
    /// back as an `Err` entry instead of failing the whole collection.
    pub async fn find_orchestrators_by_type(&self, kind: &str) -> Result<Vec<OrchestratorEntry>> {
        let mut url = self.endpoint(paths::FIND_ORCHESTRATORS_BY_TYPE)?;
        url.query_pairs_mut().append_pair("type", kind);

        let collection: HalCollection<serde_json::Value> =
            self.get_json(url, Target::Inventory).await?;
        Ok(collection
            .into_items(paths::NFV_ORCHESTRATORS)
            .into_iter()
            .map(OrchestratorRecord::from_value)
            .collect())
    }

    pub async fn list_orchestrators(&self) -> Result<Vec<OrchestratorRecord>> {
        let url = self.endpoint(paths::NFV_ORCHESTRATORS)?;
        let collection: HalCollection<OrchestratorRecord> =
            self.get_json(url, Target::Inventory).await?;
        Ok(collection.into_items(paths::NFV_ORCHESTRATORS))
    }

    pub async fn get_orchestrator(&self, nfvo_id: i64) -> Result<OrchestratorRecord> {
        let url = self.endpoint(&format!("{}/{}", paths::NFV_ORCHESTRATORS, nfvo_id))?;
        self.get_json(url, Target::Orchestrator(nfvo_id)).await
    }

    /// Follow a `site` hypermedia link
    pub async fn get_site(&self, href: &str) -> Result<SiteRecord> {
        let url = Url::parse(href)?;
        self.get_json(url, Target::Inventory).await
    }

    /// Presence check on the VIM's native identifier
    pub async fn find_vim_by_native_id(&self, native_id: &str) -> Result<Option<VimAccountRecord>> {
        let mut url = self.endpoint(paths::FIND_VIM_BY_NFVO_ID)?;
        url.query_pairs_mut().append_pair("uuid", native_id);

        let collection: HalCollection<VimAccountRecord> =
            self.get_json(url, Target::Inventory).await?;
        Ok(collection.into_items(paths::VIM_ACCOUNTS).into_iter().next())
    }

    /// Create a VIM account; the returned record carries its association link
    pub async fn create_vim(&self, vim: &VimAccount) -> Result<VimAccountRecord> {
        let url = self.endpoint(paths::VIM_ACCOUNTS)?;
        let response = self
            .send(self.client.post(url).json(vim), Target::Inventory)
            .await?;
        let created: VimAccountRecord = Self::decode(response).await?;

        info!(
            vim_account_nfvo_id = %created.vim_account_nfvo_id,
            "Created new vimAccount"
        );
        Ok(created)
    }

    pub async fn link_vim_to_orchestrator(&self, link_ref: &str, orchestrator_ref: &str) -> Result<()> {
        self.link_to_orchestrator(link_ref, orchestrator_ref, Target::Inventory)
            .await?;
        info!(orchestrator = %orchestrator_ref, "Associated vimAccount to orchestrator");
        Ok(())
    }

    pub async fn list_subscriptions(&self, nfvo_id: i64) -> Result<Vec<Subscription>> {
        let url = self.endpoint(&format!(
            "{}/{}/{}",
            paths::NFV_ORCHESTRATORS,
            nfvo_id,
            paths::SUBSCRIPTIONS
        ))?;
        let collection: HalCollection<Subscription> = self.get_json(url, Target::Inventory).await?;
        Ok(collection.into_items(paths::SUBSCRIPTIONS))
    }

    /// Create a subscription and link it to its orchestrator.
    ///
    /// A 400 from either step is reported as `BadRequest`. A failed link step
    /// leaves the created subscription in place.
    pub async fn create_subscription(
        &self,
        nfvo_id: i64,
        body: &SubscriptionRequest,
    ) -> Result<Subscription> {
        let url = self.endpoint(paths::SUBSCRIPTIONS)?;
        let response = self
            .send(self.client.post(url).json(body), Target::SubscriptionCreate)
            .await?;
        let created: SubscriptionRecord = Self::decode(response).await?;

        self.link_to_orchestrator(
            &created.links.nfv_orchestrators.href,
            &self.orchestrator_uri(nfvo_id),
            Target::SubscriptionCreate,
        )
        .await?;

        info!(
            nfvo_id = nfvo_id,
            subscription_id = created.subscription.id,
            "Created subscription"
        );
        Ok(created.subscription)
    }

    pub async fn get_subscription(&self, nfvo_id: i64, subscription_id: i64) -> Result<Subscription> {
        let url = self.endpoint(&format!(
            "{}/{}/{}/{}",
            paths::NFV_ORCHESTRATORS,
            nfvo_id,
            paths::SUBSCRIPTIONS,
            subscription_id
        ))?;
        self.get_json(url, Target::Subscription(subscription_id)).await
    }

    pub async fn delete_subscription(&self, subscription_id: i64) -> Result<()> {
        let url = self.endpoint(&format!("{}/{}", paths::SUBSCRIPTIONS, subscription_id))?;
        self.send(self.client.delete(url), Target::Subscription(subscription_id))
            .await?;
        info!(subscription_id = subscription_id, "Deleted subscription");
        Ok(())
    }
}
