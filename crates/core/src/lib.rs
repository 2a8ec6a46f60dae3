//! Domain types shared by the orchestrator, the HTTP server and the CLI.

pub mod domain;
pub mod error;

pub use domain::*;
pub use error::CoreError;
