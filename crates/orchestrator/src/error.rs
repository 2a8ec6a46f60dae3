use patterns_core::CoreError;
use thiserror::Error;
use uuid::Uuid;

use crate::oracle::OracleError;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Task not found: {0}")]
    TaskNotFound(Uuid),

    #[error("Project not found: {0}")]
    ProjectNotFound(Uuid),

    #[error("Plan not found for goal: {0}")]
    PlanNotFound(String),

    #[error("Task {task_id} is in an invalid state: {reason}")]
    InvalidState { task_id: Uuid, reason: String },

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    /// The oracle call made while executing a task failed. The task stays
    /// assigned.
    #[error("Task {task_id} failed: {source}")]
    TaskFailed {
        task_id: Uuid,
        #[source]
        source: OracleError,
    },

    #[error("Validation error: {0}")]
    Validation(String),
}

impl OrchestratorError {
    pub fn invalid_state(task_id: Uuid, reason: impl Into<String>) -> Self {
        Self::InvalidState {
            task_id,
            reason: reason.into(),
        }
    }

    /// Attach the task identity to a domain error raised by a task transition.
    pub fn from_core(task_id: Uuid, err: CoreError) -> Self {
        match err {
            CoreError::InvalidStatusTransition { from, to } => Self::InvalidState {
                task_id,
                reason: format!("cannot move from {} to {}", from, to),
            },
            CoreError::Validation(msg) => Self::Validation(msg),
        }
    }

    pub fn task_failed(task_id: Uuid, source: OracleError) -> Self {
        Self::TaskFailed { task_id, source }
    }

    /// The oracle failure behind this error, if any.
    pub fn oracle_error(&self) -> Option<&OracleError> {
        match self {
            Self::Oracle(err) | Self::TaskFailed { source: err, .. } => Some(err),
            _ => None,
        }
    }

    /// Whether retrying the same call might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self.oracle_error(), Some(OracleError::Unavailable(_)))
    }
}

impl From<CoreError> for OrchestratorError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::Validation(msg),
            other => Self::Validation(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_error_carries_task_id() {
        let task_id = Uuid::new_v4();
        let err = OrchestratorError::from_core(
            task_id,
            CoreError::InvalidStatusTransition {
                from: "pending".to_string(),
                to: "completed".to_string(),
            },
        );

        match &err {
            OrchestratorError::InvalidState { task_id: id, reason } => {
                assert_eq!(*id, task_id);
                assert!(reason.contains("pending"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains(&task_id.to_string()));
    }

    #[test]
    fn test_only_unavailable_oracle_is_retryable() {
        assert!(OrchestratorError::Oracle(OracleError::Unavailable("timeout".into())).is_retryable());
        assert!(!OrchestratorError::Oracle(OracleError::EmptyResponse).is_retryable());
        assert!(!OrchestratorError::TaskNotFound(Uuid::new_v4()).is_retryable());
        assert!(
            OrchestratorError::task_failed(Uuid::new_v4(), OracleError::Unavailable("down".into()))
                .is_retryable()
        );
    }

    #[test]
    fn test_task_failure_names_the_task() {
        let task_id = Uuid::new_v4();
        let err = OrchestratorError::task_failed(task_id, OracleError::EmptyResponse);

        assert!(err.to_string().contains(&task_id.to_string()));
        assert_eq!(err.oracle_error(), Some(&OracleError::EmptyResponse));
        assert!(std::error::Error::source(&err).is_some());
    }
}
