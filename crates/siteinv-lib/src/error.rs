//! Error taxonomy for inventory and driver operations
//!
//! Transport failures, HTTP status codes and driver failures all collapse
//! into [`InventoryError`] so callers never see `reqwest` types.

use reqwest::StatusCode;
use thiserror::Error;

/// Opaque failure reported by an orchestrator driver.
///
/// Authentication, connectivity and protocol problems are not distinguished;
/// the reconciler handles all of them the same way.
#[derive(Debug, Clone, Error)]
#[error("orchestrator driver error: {message}")]
pub struct DriverError {
    message: String,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for DriverError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Errors surfaced by the inventory client and the query/admin service.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The inventory could not be reached (connect, timeout, redirects, bad URL).
    #[error("problem contacting site inventory: {message}")]
    ServiceUnavailable { message: String },

    #[error("unauthorized by site inventory")]
    Unauthorized,

    #[error("orchestrator {id} not found")]
    OrchestratorNotFound { id: i64 },

    #[error("credentials for orchestrator {id} not found")]
    CredentialsNotFound { id: i64 },

    #[error("subscription {sub_id} not found")]
    SubscriptionNotFound { sub_id: i64 },

    #[error("bad request rejected by site inventory")]
    BadRequest,

    /// Any other non-2xx answer, or a 2xx answer with an unusable body.
    #[error("site inventory error: {message}")]
    ServiceError { message: String },

    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl InventoryError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    pub fn service(message: impl Into<String>) -> Self {
        Self::ServiceError {
            message: message.into(),
        }
    }
}

/// Every transport-level failure is reported as `ServiceUnavailable`.
impl From<reqwest::Error> for InventoryError {
    fn from(err: reqwest::Error) -> Self {
        Self::unavailable(err.to_string())
    }
}

impl From<url::ParseError> for InventoryError {
    fn from(err: url::ParseError) -> Self {
        Self::unavailable(format!("malformed URL: {err}"))
    }
}

/// Resource a request was aimed at, used to pick the not-found variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    Inventory,
    Orchestrator(i64),
    Subscription(i64),
    SubscriptionCreate,
}

/// Map a non-2xx status to a domain error.
pub(crate) fn classify_status(status: StatusCode, body: &str, target: Target) -> InventoryError {
    match (status, target) {
        (StatusCode::UNAUTHORIZED, _) => InventoryError::Unauthorized,
        (StatusCode::NOT_FOUND, Target::Orchestrator(id)) => {
            InventoryError::OrchestratorNotFound { id }
        }
        (StatusCode::NOT_FOUND, Target::Subscription(sub_id)) => {
            InventoryError::SubscriptionNotFound { sub_id }
        }
        (StatusCode::BAD_REQUEST, Target::SubscriptionCreate) => InventoryError::BadRequest,
        _ if body.is_empty() => InventoryError::service(format!("HTTP {status}")),
        _ => InventoryError::service(format!("HTTP {status}: {body}")),
    }
}
