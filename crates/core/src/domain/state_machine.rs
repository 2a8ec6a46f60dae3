use super::task::TaskStatus;
use crate::error::CoreError;

/// Linear task lifecycle: `Pending -> Assigned -> Completed`.
pub struct TaskStateMachine;

impl TaskStateMachine {
    pub fn validate_transition(from: &TaskStatus, to: &TaskStatus) -> Result<(), CoreError> {
        if Self::allowed_transitions(from).contains(to) {
            Ok(())
        } else {
            Err(CoreError::InvalidStatusTransition {
                from: from.as_str().to_string(),
                to: to.as_str().to_string(),
            })
        }
    }

    fn allowed_transitions(from: &TaskStatus) -> &'static [TaskStatus] {
        match from {
            TaskStatus::Pending => &[TaskStatus::Assigned],
            TaskStatus::Assigned => &[TaskStatus::Completed],
            TaskStatus::Completed => &[],
        }
    }
}
