//! Boundary to the natural-language reasoning service.
//!
//! Everything the orchestrator knows about the model is the single
//! [`Oracle::complete`] call. Adapters live in submodules:
//! [`HttpOracle`] talks to an OpenAI-compatible chat completions endpoint and
//! [`ScriptedOracle`] is a deterministic stand-in for tests and dry runs.

mod http;
mod scripted;
mod types;

use async_trait::async_trait;
use thiserror::Error;

use crate::prompts::Prompt;

pub use http::HttpOracle;
pub use scripted::{RecordedCall, ScriptedOracle};
pub use types::{ChatMessage, ChatRole};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OracleError {
    /// Transport failure, timeout, rate limit or provider-side outage.
    #[error("Oracle unavailable: {0}")]
    Unavailable(String),

    /// The provider answered with a non-success status.
    #[error("Oracle provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    /// The call succeeded but produced no usable text.
    #[error("Oracle returned an empty response")]
    EmptyResponse,
}

/// One blocking round trip to the reasoning service.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, OracleError>;
}

/// Run `prompt` and reject replies with no visible text.
///
/// Used wherever the reply becomes a stored result or user-facing answer.
/// Decomposition and classification call [`Oracle::complete`] directly, since
/// an empty list or an unrecognised label are valid outcomes there.
pub(crate) async fn complete_non_empty(
    oracle: &dyn Oracle,
    prompt: &Prompt,
) -> Result<String, OracleError> {
    let text = oracle.complete(prompt.system, &prompt.user).await?;
    if text.trim().is_empty() {
        return Err(OracleError::EmptyResponse);
    }
    Ok(text)
}
