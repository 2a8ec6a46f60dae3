//! Event system for the agent pattern services
//!
//! This crate provides the event bus and event types published whenever
//! the orchestrator changes a task, project or plan.

mod bus;
mod types;

pub use bus::EventBus;
pub use types::*;
