use axum::extract::{Query, State};
use axum::Json;
use patterns_core::ReactResponse;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{AppError, ErrorResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReactQuery {
    pub query: String,
}

#[utoipa::path(
    get,
    path = "/api/react",
    params(ReactQuery),
    responses(
        (status = 200, description = "Reasoning transcript and final answer", body = ReactResponse),
        (status = 400, description = "Empty query", body = ErrorResponse),
        (status = 502, description = "Oracle failure", body = ErrorResponse),
        (status = 503, description = "Oracle unavailable", body = ErrorResponse),
    ),
    tag = "react"
)]
pub async fn react(
    State(state): State<AppState>,
    Query(params): Query<ReactQuery>,
) -> Result<Json<ReactResponse>, AppError> {
    Ok(Json(state.orchestrator.react(&params.query).await?))
}
