use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome of one reason/act pass over a query.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReactResponse {
    pub query: String,
    /// Full REASONING / ACTION / OBSERVATION trace as returned by the oracle.
    pub transcript: String,
    pub final_answer: String,
}
