//! Runtime infrastructure - Tokio runtime bridge for async service calls

mod bridge;
mod worker;

pub use bridge::{RuntimeBridge, RuntimeCommand, ServiceClient, ServiceReply, Ticket};
pub use worker::run_service_worker;
