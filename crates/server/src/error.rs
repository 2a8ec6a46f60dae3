use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use orchestrator::OrchestratorError;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    /// Oracle failure. `retryable` failures are reported as 503.
    Oracle { retryable: bool, message: String },
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "invalid_state", msg),
            AppError::Oracle { retryable, message } => {
                tracing::error!(retryable, "Oracle error: {}", message);
                if retryable {
                    (StatusCode::SERVICE_UNAVAILABLE, "oracle_unavailable", message)
                } else {
                    (StatusCode::BAD_GATEWAY, "oracle_error", message)
                }
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<OrchestratorError> for AppError {
    fn from(err: OrchestratorError) -> Self {
        match err {
            OrchestratorError::TaskNotFound(_)
            | OrchestratorError::ProjectNotFound(_)
            | OrchestratorError::PlanNotFound(_) => AppError::NotFound(err.to_string()),
            OrchestratorError::InvalidState { .. } => AppError::Conflict(err.to_string()),
            OrchestratorError::Validation(msg) => AppError::BadRequest(msg),
            OrchestratorError::Oracle(_) | OrchestratorError::TaskFailed { .. } => AppError::Oracle {
                retryable: err.is_retryable(),
                message: err.to_string(),
            },
        }
    }
}
