//! CLI command implementations

pub mod orchestrators;
pub mod subscriptions;
pub mod sync;
