//! Agent configuration

use anyhow::Result;
use serde::Deserialize;
use siteinv_lib::driver::OsmDriverConfig;
use siteinv_lib::InventoryConfig;
use std::time::Duration;

/// Agent configuration, read from `SITEINV_*` environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Site inventory host
    #[serde(default = "default_host")]
    pub host: String,

    /// Site inventory port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Sweep interval in seconds
    #[serde(default = "default_interval")]
    pub interval: u64,

    /// Timeout for each inventory and OSM request, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// API server port for health/metrics
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// OSM project used when requesting tokens
    #[serde(default = "default_osm_project")]
    pub osm_project: String,

    #[serde(default = "default_accept_invalid_certs")]
    pub osm_accept_invalid_certs: bool,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8087
}

fn default_interval() -> u64 {
    300
}

fn default_request_timeout() -> u64 {
    30
}

fn default_api_port() -> u16 {
    8080
}

fn default_osm_project() -> String {
    "admin".to_string()
}

fn default_accept_invalid_certs() -> bool {
    true
}

impl AgentConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("SITEINV").try_parsing(true))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    pub fn inventory(&self) -> InventoryConfig {
        InventoryConfig {
            host: self.host.clone(),
            port: self.port,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn osm_driver(&self) -> OsmDriverConfig {
        OsmDriverConfig {
            project_id: self.osm_project.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            accept_invalid_certs: self.osm_accept_invalid_certs,
            ..OsmDriverConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_without_environment() {
        let config: AgentConfig = config::Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 8087);
        assert_eq!(config.interval(), Duration::from_secs(300));
        assert_eq!(config.inventory().base_url(), "http://localhost:8087/");
        assert_eq!(config.osm_driver().project_id, "admin");
    }

    #[test]
    fn test_overrides() {
        let config: AgentConfig = config::Config::builder()
            .set_override("host", "inventory.local")
            .unwrap()
            .set_override("port", 9090)
            .unwrap()
            .set_override("interval", 60)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.inventory().base_url(), "http://inventory.local:9090/");
        assert_eq!(config.interval(), Duration::from_secs(60));
    }
}
