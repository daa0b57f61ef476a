//! Orchestrator driver boundary
//!
//! A driver turns orchestrator credentials into the orchestrator's current
//! VIM list. Which protocol it speaks is its own business; every failure
//! comes back as a single [`DriverError`].

mod osm;

pub use osm::{OsmDriver, OsmDriverConfig};

use crate::error::DriverError;
use crate::models::DriverCredentials;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use async_trait::async_trait;

/// VIM account as reported by an orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsmVim {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub vim_type: String,
    pub vim_url: String,
    #[serde(default)]
    pub vim_tenant_name: Option<String>,
}

/// VIM list plus whatever response metadata the driver exposes
#[derive(Debug, Clone, Default)]
pub struct VimListing {
    pub vims: Vec<OsmVim>,
    pub headers: HashMap<String, String>,
}

impl VimListing {
    pub fn new(vims: Vec<OsmVim>) -> Self {
        Self {
            vims,
            headers: HashMap::new(),
        }
    }
}

/// Trait for orchestrator driver implementations
#[async_trait]
pub trait OrchestratorDriver: Send + Sync {
    /// Fetch the orchestrator's current VIM list
    async fn vim_list(&self, credentials: &DriverCredentials) -> Result<VimListing, DriverError>;
}
