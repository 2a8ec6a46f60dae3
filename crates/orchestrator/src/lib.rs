//! Orchestration core: delegation, planning, execution and reflection over a
//! shared in-memory registry, driven by an injected [`Oracle`].

pub mod config;
pub mod delegation;
pub mod error;
pub mod executor;
pub mod oracle;
pub mod orchestrator;
pub mod parser;
pub mod planner;
pub mod prompts;
pub mod reflection;
pub mod resources;
pub mod store;

pub use config::{OracleConfig, OrchestratorConfig};
pub use delegation::{normalize_role, DelegationEngine};
pub use error::{OrchestratorError, Result};
pub use executor::ExecutionEngine;
pub use oracle::{HttpOracle, Oracle, OracleError, RecordedCall, ScriptedOracle};
pub use orchestrator::Orchestrator;
pub use parser::{final_answer, parse_numbered_list};
pub use planner::PlanGenerator;
pub use prompts::{PatternPrompts, Prompt};
pub use reflection::ReflectionLoop;
pub use store::{Registry, StoredPlan};
