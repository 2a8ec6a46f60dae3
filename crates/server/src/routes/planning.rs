use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use patterns_core::{
    ExecutePlanRequest, ExecuteStepRequest, GeneratePlanRequest, PlanExecution, PlanView,
    StepExecution,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{AppError, ErrorResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct GoalQuery {
    pub goal: String,
}

#[utoipa::path(
    post,
    path = "/api/planning/plan",
    request_body = GeneratePlanRequest,
    responses(
        (status = 201, description = "Plan generated and stored under its goal", body = PlanView),
        (status = 400, description = "Empty goal", body = ErrorResponse),
        (status = 502, description = "Oracle failure", body = ErrorResponse),
    ),
    tag = "planning"
)]
pub async fn create_plan(
    State(state): State<AppState>,
    Json(payload): Json<GeneratePlanRequest>,
) -> Result<(StatusCode, Json<PlanView>), AppError> {
    let plan = state.orchestrator.create_plan(&payload.goal).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

#[utoipa::path(
    get,
    path = "/api/planning/plan",
    params(GoalQuery),
    responses(
        (status = 200, description = "Stored plan", body = PlanView),
        (status = 404, description = "No plan for this goal", body = ErrorResponse),
    ),
    tag = "planning"
)]
pub async fn get_plan(
    State(state): State<AppState>,
    Query(query): Query<GoalQuery>,
) -> Result<Json<PlanView>, AppError> {
    Ok(Json(state.orchestrator.get_plan(&query.goal).await?))
}

#[utoipa::path(
    get,
    path = "/api/planning/plans",
    responses(
        (status = 200, description = "Every stored plan keyed by goal", body = BTreeMap<String, PlanView>),
    ),
    tag = "planning"
)]
pub async fn list_plans(State(state): State<AppState>) -> Json<BTreeMap<String, PlanView>> {
    Json(state.orchestrator.list_plans().await)
}

#[utoipa::path(
    post,
    path = "/api/planning/execute-task",
    request_body = ExecuteStepRequest,
    responses(
        (status = 200, description = "Step executed", body = StepExecution),
        (status = 400, description = "Empty task", body = ErrorResponse),
        (status = 502, description = "Oracle failure", body = ErrorResponse),
    ),
    tag = "planning"
)]
pub async fn execute_step(
    State(state): State<AppState>,
    Json(payload): Json<ExecuteStepRequest>,
) -> Result<Json<StepExecution>, AppError> {
    Ok(Json(state.orchestrator.execute_step(&payload.task).await?))
}

#[utoipa::path(
    post,
    path = "/api/planning/execute-plan",
    request_body = ExecutePlanRequest,
    responses(
        (status = 200, description = "Every step executed", body = PlanExecution),
        (status = 404, description = "No plan for this goal", body = ErrorResponse),
        (status = 409, description = "Plan already executed", body = ErrorResponse),
        (status = 502, description = "Oracle failure; earlier steps stay completed", body = ErrorResponse),
    ),
    tag = "planning"
)]
pub async fn execute_plan(
    State(state): State<AppState>,
    Json(payload): Json<ExecutePlanRequest>,
) -> Result<Json<PlanExecution>, AppError> {
    Ok(Json(state.orchestrator.execute_plan(&payload.goal).await?))
}
