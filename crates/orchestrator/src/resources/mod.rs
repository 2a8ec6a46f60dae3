//! RAII guards for execution bookkeeping.
//!
//! - [`ExecutionGuard`] - releases a task's in-flight claim and reports
//!   executions that never reached a terminal state

mod execution_guard;

pub use execution_guard::{ExecutionGuard, InFlightSet};
