//! Site inventory adapter library
//!
//! This crate provides the core functionality for:
//! - Talking to the site inventory REST service
//! - Fetching VIM lists from OSM orchestrators
//! - Periodic VIM reconciliation into the inventory
//! - Query/admin operations over orchestrators and subscriptions
//! - Health checks and observability

pub mod admin;
pub mod driver;
pub mod error;
pub mod health;
pub mod inventory;
pub mod models;
pub mod observability;
pub mod sync;

pub use admin::InventoryService;
pub use error::{DriverError, InventoryError};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
    SweepSummary,
};
pub use inventory::{InventoryClient, InventoryConfig};
pub use models::*;
pub use observability::{StructuredLogger, SyncMetrics};
