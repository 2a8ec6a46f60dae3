use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use patterns_core::{CreateProjectRequest, ProjectCreated, ProjectExecution, Task, TaskExecution};
use uuid::Uuid;

use crate::error::{AppError, ErrorResponse};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/multi-agent/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project decomposed and every task assigned", body = ProjectCreated),
        (status = 400, description = "Empty project request", body = ErrorResponse),
        (status = 502, description = "Oracle failure", body = ErrorResponse),
    ),
    tag = "multi-agent"
)]
pub async fn create_project(
    State(state): State<AppState>,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectCreated>), AppError> {
    let created = state
        .orchestrator
        .create_project(&payload.project_request)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/multi-agent/projects/{id}/tasks",
    params(("id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project tasks in execution order", body = Vec<Task>),
        (status = 404, description = "Project not found", body = ErrorResponse),
    ),
    tag = "multi-agent"
)]
pub async fn list_project_tasks(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Task>>, AppError> {
    Ok(Json(state.orchestrator.list_tasks(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/multi-agent/projects/{id}/execute-all",
    params(("id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Every task executed", body = ProjectExecution),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 409, description = "A task was not assigned", body = ErrorResponse),
        (status = 502, description = "Oracle failure; earlier tasks stay completed", body = ErrorResponse),
    ),
    tag = "multi-agent"
)]
pub async fn execute_all(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectExecution>, AppError> {
    Ok(Json(state.orchestrator.execute_all(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/multi-agent/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task found", body = Task),
        (status = 404, description = "Task not found", body = ErrorResponse),
    ),
    tag = "multi-agent"
)]
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Task>, AppError> {
    Ok(Json(state.orchestrator.get_task(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/multi-agent/tasks/{id}/execute",
    params(("id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task executed", body = TaskExecution),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 409, description = "Task is not assigned or already executing", body = ErrorResponse),
        (status = 502, description = "Oracle failure; task stays assigned", body = ErrorResponse),
    ),
    tag = "multi-agent"
)]
pub async fn execute_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskExecution>, AppError> {
    Ok(Json(state.orchestrator.execute_task(id).await?))
}
