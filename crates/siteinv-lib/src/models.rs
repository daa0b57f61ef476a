//! Core data models for the site inventory adapter
//!
//! Records with a `Record` suffix mirror the inventory's wire format;
//! the rest are the normalized shapes handed to callers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Hypermedia link as it appears under `_links`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

/// HAL collection envelope, `{"_embedded": {"<name>": [...]}}`
#[derive(Debug, Deserialize)]
pub(crate) struct HalCollection<T> {
    #[serde(rename = "_embedded", default = "HashMap::new")]
    embedded: HashMap<String, Vec<T>>,
}

impl<T> HalCollection<T> {
    /// Take the named collection, empty if the inventory omitted it
    pub(crate) fn into_items(mut self, name: &str) -> Vec<T> {
        self.embedded.remove(name).unwrap_or_default()
    }
}

/// Credentials as stored by the inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredentials {
    #[serde(default)]
    pub id: Option<i64>,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

/// Credentials in the shape an orchestrator driver expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverCredentials {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub nfvo_id: i64,
}

impl DriverCredentials {
    /// Drop the storage id, rename `username` and point back at the owner.
    pub fn from_stored(nfvo_id: i64, stored: &StoredCredentials) -> Self {
        Self {
            host: stored.host.clone(),
            port: stored.port,
            user: stored.username.clone(),
            password: stored.password.clone(),
            nfvo_id,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrchestratorLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    #[serde(default)]
    pub site: Option<Link>,
}

/// Orchestrator exactly as the inventory returns it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestratorRecord {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub credentials: Option<StoredCredentials>,
    #[serde(rename = "_links")]
    pub links: OrchestratorLinks,
}

impl OrchestratorRecord {
    /// URI used as the owner reference in association writes
    pub fn self_href(&self) -> &str {
        &self.links.self_link.href
    }

    pub fn driver_credentials(&self) -> Option<DriverCredentials> {
        self.credentials
            .as_ref()
            .map(|stored| DriverCredentials::from_stored(self.id, stored))
    }

    /// Decode one collection entry, keeping its raw id on failure
    pub fn from_value(value: serde_json::Value) -> Result<Self, MalformedRecord> {
        let id = value.get("id").and_then(serde_json::Value::as_i64);
        serde_json::from_value(value).map_err(|e| MalformedRecord {
            id,
            error: e.to_string(),
        })
    }
}

/// Collection entry that could not be decoded as an orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    /// Raw `id` of the entry, when it carried a numeric one
    pub id: Option<i64>,
    pub error: String,
}

/// One entry of an orchestrator collection, decoded on its own
pub type OrchestratorEntry = Result<OrchestratorRecord, MalformedRecord>;

/// Normalized orchestrator; null optionals are left out when serialized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Orchestrator {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub site: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Orchestrator {
    pub fn from_record(record: OrchestratorRecord, site: String) -> Self {
        Self {
            id: record.id,
            name: record.name,
            kind: record.kind,
            site,
            uri: record.uri,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteRecord {
    pub name: String,
}

/// VIM account payload posted to the inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VimAccount {
    pub vim_account_nfvo_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
}

/// Links carried by records that can be associated to an orchestrator
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedLinks {
    #[serde(rename = "self", default)]
    pub self_link: Option<Link>,
    pub nfv_orchestrators: Link,
}

/// VIM account as returned by the inventory
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VimAccountRecord {
    pub vim_account_nfvo_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "_links")]
    pub links: OwnedLinks,
}

impl VimAccountRecord {
    /// Association endpoint used to link this account to its orchestrator
    pub fn owner_link(&self) -> &str {
        &self.links.nfv_orchestrators.href
    }

    pub fn self_href(&self) -> Option<&str> {
        self.links.self_link.as_ref().map(|link| link.href.as_str())
    }
}

/// Subscription in its public shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: i64,
    pub callback_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ns_instance_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notification_types: Vec<String>,
}

/// Subscription as returned by a create call, still carrying its links
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SubscriptionRecord {
    #[serde(flatten)]
    pub subscription: Subscription,
    #[serde(rename = "_links")]
    pub links: OwnedLinks,
}

/// Body of a subscription create request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRequest {
    pub callback_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ns_instance_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notification_types: Vec<String>,
}
