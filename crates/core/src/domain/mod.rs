mod plan;
mod project;
mod query;
mod role;
mod state_machine;
mod task;

pub use plan::*;
pub use project::*;
pub use query::ReactResponse;
pub use role::HandlerRole;
pub use state_machine::TaskStateMachine;
pub use task::*;
