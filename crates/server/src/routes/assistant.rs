use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, ErrorResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct AssistantQuery {
    pub query: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssistantResponse {
    pub query: String,
    pub answer: String,
}

#[utoipa::path(
    get,
    path = "/api/assistant",
    params(AssistantQuery),
    responses(
        (status = 200, description = "Direct answer", body = AssistantResponse),
        (status = 400, description = "Empty query", body = ErrorResponse),
        (status = 502, description = "Oracle failure", body = ErrorResponse),
    ),
    tag = "assistant"
)]
pub async fn ask(
    State(state): State<AppState>,
    Query(params): Query<AssistantQuery>,
) -> Result<Json<AssistantResponse>, AppError> {
    let answer = state.orchestrator.ask(&params.query).await?;
    Ok(Json(AssistantResponse {
        query: params.query,
        answer,
    }))
}
