//! OSM northbound interface driver
//!
//! Authenticates against `/osm/admin/v1/tokens` and lists VIM accounts from
//! `/osm/admin/v1/vim_accounts`.

use super::{async_trait, OrchestratorDriver, OsmVim, VimListing};
use crate::error::DriverError;
use crate::models::DriverCredentials;
use reqwest::{header, Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const TOKENS_PATH: &str = "osm/admin/v1/tokens";
const VIM_ACCOUNTS_PATH: &str = "osm/admin/v1/vim_accounts";

/// Configuration for the OSM driver
#[derive(Debug, Clone)]
pub struct OsmDriverConfig {
    /// URL scheme of the NBI (default: https)
    pub scheme: String,
    /// Project requested when authenticating (default: admin)
    pub project_id: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Accept self-signed NBI certificates
    pub accept_invalid_certs: bool,
}

impl Default for OsmDriverConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            project_id: "admin".to_string(),
            request_timeout: Duration::from_secs(30),
            accept_invalid_certs: true,
        }
    }
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    username: &'a str,
    password: &'a str,
    project_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    id: String,
}

/// Driver for OSM release 5+ NBI
pub struct OsmDriver {
    client: Client,
    config: OsmDriverConfig,
}

impl OsmDriver {
    pub fn new(config: OsmDriverConfig) -> Result<Self, DriverError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self { client, config })
    }

    fn url(&self, credentials: &DriverCredentials, path: &str) -> String {
        format!(
            "{}://{}:{}/{}",
            self.config.scheme, credentials.host, credentials.port, path
        )
    }

    async fn ensure_success(response: Response, step: &str) -> Result<Response, DriverError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(DriverError::new(format!("{step} failed with HTTP {status}: {body}")))
    }

    async fn authenticate(&self, credentials: &DriverCredentials) -> Result<String, DriverError> {
        let request = TokenRequest {
            username: &credentials.user,
            password: &credentials.password,
            project_id: &self.config.project_id,
        };

        let response = self
            .client
            .post(self.url(credentials, TOKENS_PATH))
            .header(header::ACCEPT, "application/json")
            .json(&request)
            .send()
            .await?;
        let response = Self::ensure_success(response, "authentication").await?;

        let token: TokenResponse = response.json().await?;
        debug!(host = %credentials.host, "Authenticated to OSM");
        Ok(token.id)
    }
}

#[async_trait]
impl OrchestratorDriver for OsmDriver {
    async fn vim_list(&self, credentials: &DriverCredentials) -> Result<VimListing, DriverError> {
        let token = self.authenticate(credentials).await?;

        let response = self
            .client
            .get(self.url(credentials, VIM_ACCOUNTS_PATH))
            .header(header::ACCEPT, "application/json")
            .bearer_auth(token)
            .send()
            .await?;
        let response = Self::ensure_success(response, "vim listing").await?;

        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let vims: Vec<OsmVim> = response.json().await?;

        debug!(
            host = %credentials.host,
            port = credentials.port,
            vims = vims.len(),
            "Fetched VIM list from OSM"
        );
        Ok(VimListing { vims, headers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn driver() -> OsmDriver {
        OsmDriver::new(OsmDriverConfig {
            scheme: "http".to_string(),
            request_timeout: Duration::from_secs(5),
            ..OsmDriverConfig::default()
        })
        .unwrap()
    }

    fn credentials_for(server: &Server) -> DriverCredentials {
        let address = server.host_with_port();
        let (host, port) = address.rsplit_once(':').unwrap();
        DriverCredentials {
            host: host.to_string(),
            port: port.parse().unwrap(),
            user: "u".to_string(),
            password: "p".to_string(),
            nfvo_id: 1,
        }
    }

    #[test]
    fn test_default_config() {
        let config = OsmDriverConfig::default();
        assert_eq!(config.scheme, "https");
        assert_eq!(config.project_id, "admin");
        assert!(config.accept_invalid_certs);
    }

    #[tokio::test]
    async fn test_vim_list_authenticates_then_lists() {
        let mut server = Server::new_async().await;
        let token = server
            .mock("POST", "/osm/admin/v1/tokens")
            .match_body(Matcher::Json(json!({
                "username": "u",
                "password": "p",
                "project_id": "admin"
            })))
            .with_status(200)
            .with_body(json!({ "id": "tok-1", "expires": 1.0 }).to_string())
            .expect(1)
            .create_async()
            .await;
        let listing = server
            .mock("GET", "/osm/admin/v1/vim_accounts")
            .match_header("authorization", "Bearer tok-1")
            .with_status(200)
            .with_header("x-request-id", "abc")
            .with_body(
                json!([{
                    "_id": "v1",
                    "name": "vim1",
                    "vim_type": "openstack",
                    "vim_url": "http://x",
                    "vim_tenant_name": "t1",
                    "_admin": { "operationalState": "ENABLED" }
                }])
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let result = driver().vim_list(&credentials_for(&server)).await.unwrap();

        token.assert_async().await;
        listing.assert_async().await;
        assert_eq!(result.vims.len(), 1);
        assert_eq!(result.vims[0].id, "v1");
        assert_eq!(result.vims[0].vim_tenant_name.as_deref(), Some("t1"));
        assert_eq!(result.headers.get("x-request-id").map(String::as_str), Some("abc"));
    }

    #[tokio::test]
    async fn test_rejected_login_is_driver_error() {
        let mut server = Server::new_async().await;
        let listing = server
            .mock("GET", "/osm/admin/v1/vim_accounts")
            .expect(0)
            .create_async()
            .await;
        server
            .mock("POST", "/osm/admin/v1/tokens")
            .with_status(401)
            .with_body("invalid credentials")
            .create_async()
            .await;

        let err = driver()
            .vim_list(&credentials_for(&server))
            .await
            .unwrap_err();

        listing.assert_async().await;
        assert!(err.message().contains("authentication"));
    }

    #[tokio::test]
    async fn test_unreachable_orchestrator_is_driver_error() {
        let credentials = DriverCredentials {
            host: "127.0.0.1".to_string(),
            port: 9,
            user: "u".to_string(),
            password: "p".to_string(),
            nfvo_id: 1,
        };

        assert!(driver().vim_list(&credentials).await.is_err());
    }
}
