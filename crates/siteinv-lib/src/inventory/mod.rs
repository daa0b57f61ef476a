//! Site inventory REST client
//!
//! Single point of contact with the inventory service. Every request goes
//! through one send path that turns transport failures and status codes
//! into [`crate::error::InventoryError`].

mod client;


pub use client::{InventoryClient, InventoryConfig};

/// Collection roots exposed by the inventory
pub mod paths {
    pub const NFV_ORCHESTRATORS: &str = "nfvOrchestrators";
    pub const VIM_ACCOUNTS: &str = "vimAccounts";
    pub const SUBSCRIPTIONS: &str = "subscriptions";
    pub const FIND_ORCHESTRATORS_BY_TYPE: &str = "nfvOrchestrators/search/findByTypeIgnoreCase";
    pub const FIND_VIM_BY_NFVO_ID: &str = "vimAccounts/search/findByVimAccountNfvoId";
}

/// Content type of association writes
pub const URI_LIST: &str = "text/uri-list";
