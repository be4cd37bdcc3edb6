//! Infrastructure layer - runtime plumbing around the service collaborator
//!
//! This layer contains:
//! - Tokio runtime bridge for async service calls
//! - Logging setup
//! - Knowledge vault exporters

pub mod export;
pub mod logging;
pub mod runtime;

pub use runtime::{RuntimeBridge, ServiceClient, ServiceReply, Ticket};
