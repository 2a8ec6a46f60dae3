use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::role::HandlerRole;
use super::state_machine::TaskStateMachine;
use crate::error::CoreError;

/// Category recorded on a task before delegation has classified it.
pub const UNCLASSIFIED_CATEGORY: &str = "unknown";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    Assigned,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of delegated work.
///
/// Fields are only reachable through accessors so that every mutation goes
/// through [`Task::assign`] or [`Task::complete`]. Both check the move with
/// [`TaskStateMachine`] before touching anything, which keeps `handler` set
/// exactly when the task is assigned or later and `result` set exactly when
/// it is completed.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Task {
    id: Uuid,
    description: String,
    category: String,
    status: TaskStatus,
    handler: Option<HandlerRole>,
    result: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a pending, unclassified task. Blank descriptions are rejected.
    pub fn new(description: impl Into<String>) -> Result<Self, CoreError> {
        let description = description.into().trim().to_string();
        if description.is_empty() {
            return Err(CoreError::Validation(
                "Task description cannot be empty".to_string(),
            ));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            description,
            category: UNCLASSIFIED_CATEGORY.to_string(),
            status: TaskStatus::default(),
            handler: None,
            result: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn handler(&self) -> Option<HandlerRole> {
        self.handler
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// `Pending -> Assigned`, attaching the handler that will execute the task.
    pub fn assign(&mut self, handler: HandlerRole) -> Result<(), CoreError> {
        TaskStateMachine::validate_transition(&self.status, &TaskStatus::Assigned)?;

        self.handler = Some(handler);
        self.category = handler.category().to_string();
        self.status = TaskStatus::Assigned;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// `Assigned -> Completed`, attaching the execution result.
    pub fn complete(&mut self, result: impl Into<String>) -> Result<(), CoreError> {
        TaskStateMachine::validate_transition(&self.status, &TaskStatus::Completed)?;

        self.result = Some(result.into());
        self.status = TaskStatus::Completed;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Response body of a single task execution.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskExecution {
    pub task_id: Uuid,
    pub description: String,
    pub handler: Option<HandlerRole>,
    pub status: TaskStatus,
    pub result: String,
}

impl TaskExecution {
    pub fn from_task(task: &Task, result: String) -> Self {
        Self {
            task_id: task.id(),
            description: task.description().to_string(),
            handler: task.handler(),
            status: task.status(),
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invariants(task: &Task) {
        assert_eq!(task.status() == TaskStatus::Completed, task.result().is_some());
        assert_eq!(
            matches!(task.status(), TaskStatus::Assigned | TaskStatus::Completed),
            task.handler().is_some()
        );
    }

    #[test]
    fn test_task_creation() {
        let task = Task::new("  Set up CI pipeline ").unwrap();

        assert_eq!(task.description(), "Set up CI pipeline");
        assert_eq!(task.category(), UNCLASSIFIED_CATEGORY);
        assert_eq!(task.status(), TaskStatus::Pending);
        assert!(task.handler().is_none());
        assert!(task.result().is_none());
        assert_invariants(&task);
    }

    #[test]
    fn test_task_rejects_blank_description() {
        assert!(matches!(Task::new("   "), Err(CoreError::Validation(_))));
        assert!(matches!(Task::new(""), Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_task_ids_are_unique() {
        let a = Task::new("a").unwrap();
        let b = Task::new("a").unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_full_lifecycle() {
        let mut task = Task::new("Design the service layout").unwrap();

        task.assign(HandlerRole::TechnicalLead).unwrap();
        assert_eq!(task.status(), TaskStatus::Assigned);
        assert_eq!(task.handler(), Some(HandlerRole::TechnicalLead));
        assert_eq!(task.category(), HandlerRole::TechnicalLead.category());
        assert_invariants(&task);

        task.complete("Use a layered architecture").unwrap();
        assert_eq!(task.status(), TaskStatus::Completed);
        assert_eq!(task.result(), Some("Use a layered architecture"));
        assert_invariants(&task);
    }

    #[test]
    fn test_complete_from_pending_fails_without_mutation() {
        let mut task = Task::new("Write docs").unwrap();
        let before = task.updated_at();

        let err = task.complete("done").unwrap_err();
        assert!(matches!(err, CoreError::InvalidStatusTransition { .. }));
        assert_eq!(task.status(), TaskStatus::Pending);
        assert!(task.result().is_none());
        assert_eq!(task.updated_at(), before);
        assert_invariants(&task);
    }

    #[test]
    fn test_assign_twice_fails() {
        let mut task = Task::new("Write docs").unwrap();
        task.assign(HandlerRole::SoftwareEngineer).unwrap();

        assert!(task.assign(HandlerRole::DevOpsEngineer).is_err());
        assert_eq!(task.handler(), Some(HandlerRole::SoftwareEngineer));
    }

    #[test]
    fn test_completed_task_rejects_further_moves() {
        let mut task = Task::new("Ship it").unwrap();
        task.assign(HandlerRole::DevOpsEngineer).unwrap();
        task.complete("shipped").unwrap();

        assert!(task.complete("again").is_err());
        assert!(task.assign(HandlerRole::TechnicalLead).is_err());
        assert_eq!(task.result(), Some("shipped"));
        assert_eq!(task.status(), TaskStatus::Completed);
    }

    #[test]
    fn test_task_status_labels() {
        assert_eq!(TaskStatus::Assigned.as_str(), "assigned");
        assert_eq!(TaskStatus::Completed.to_string(), "completed");
    }

    #[test]
    fn test_task_serialization() {
        let mut task = Task::new("Provision a database").unwrap();
        task.assign(HandlerRole::DevOpsEngineer).unwrap();

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["status"], "assigned");
        assert_eq!(json["handler"], "DevOps Engineer");
        assert_eq!(json["category"], "devops");
        assert!(json["result"].is_null());
    }
}
