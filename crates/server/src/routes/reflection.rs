use axum::extract::{Query, State};
use axum::Json;
use patterns_core::ReflectionResponse;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{AppError, ErrorResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReflectionQuery {
    pub query: String,
    /// Critique rounds. Defaults to the server's configured value.
    pub iterations: Option<u32>,
}

#[utoipa::path(
    get,
    path = "/api/reflection",
    params(ReflectionQuery),
    responses(
        (status = 200, description = "Initial and refined answers", body = ReflectionResponse),
        (status = 400, description = "Empty query or too many iterations", body = ErrorResponse),
        (status = 502, description = "Oracle failure", body = ErrorResponse),
    ),
    tag = "reflection"
)]
pub async fn reflect(
    State(state): State<AppState>,
    Query(params): Query<ReflectionQuery>,
) -> Result<Json<ReflectionResponse>, AppError> {
    let response = state
        .orchestrator
        .reflect(&params.query, params.iterations)
        .await?;
    Ok(Json(response))
}
