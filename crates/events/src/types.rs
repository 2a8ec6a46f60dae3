//! Event types for the orchestration event stream

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Envelope wrapping all events with metadata
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: Event,
}

impl EventEnvelope {
    /// Create a new event envelope with auto-generated ID and timestamp
    pub fn new(event: Event) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// All possible events in the system
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    // Project events
    /// A request was decomposed and its tasks stored
    #[serde(rename = "project.created")]
    ProjectCreated { project_id: Uuid, task_count: usize },

    // Task events
    /// A task entered the registry in `pending`
    #[serde(rename = "task.created")]
    TaskCreated { task_id: Uuid, description: String },

    /// A handler was attached to a task
    #[serde(rename = "task.assigned")]
    TaskAssigned { task_id: Uuid, handler: String },

    /// A task reached its terminal state
    #[serde(rename = "task.completed")]
    TaskCompleted { task_id: Uuid, handler: String },

    /// The oracle call for a task failed; the task stays assigned
    #[serde(rename = "task.execution_failed")]
    TaskExecutionFailed { task_id: Uuid, error: String },

    // Plan events
    /// A plan was stored under its goal
    #[serde(rename = "plan.stored")]
    PlanStored { goal: String, step_count: usize },

    /// Every step of a plan ran through the bulk path
    #[serde(rename = "plan.completed")]
    PlanCompleted { goal: String },

    // Reflection events
    /// One critique/rewrite round finished
    #[serde(rename = "reflection.round")]
    ReflectionRound { round: u32, of: u32 },
}

impl Event {
    /// Get the task ID associated with this event, if any
    pub fn task_id(&self) -> Option<Uuid> {
        match self {
            Event::TaskCreated { task_id, .. } => Some(*task_id),
            Event::TaskAssigned { task_id, .. } => Some(*task_id),
            Event::TaskCompleted { task_id, .. } => Some(*task_id),
            Event::TaskExecutionFailed { task_id, .. } => Some(*task_id),
            Event::ProjectCreated { .. }
            | Event::PlanStored { .. }
            | Event::PlanCompleted { .. }
            | Event::ReflectionRound { .. } => None,
        }
    }

    /// Wire name of the event, matching its serde tag
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::ProjectCreated { .. } => "project.created",
            Event::TaskCreated { .. } => "task.created",
            Event::TaskAssigned { .. } => "task.assigned",
            Event::TaskCompleted { .. } => "task.completed",
            Event::TaskExecutionFailed { .. } => "task.execution_failed",
            Event::PlanStored { .. } => "plan.stored",
            Event::PlanCompleted { .. } => "plan.completed",
            Event::ReflectionRound { .. } => "reflection.round",
        }
    }
}
