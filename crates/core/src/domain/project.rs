use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::task::Task;

/// A request decomposed into tasks by one delegation pass.
///
/// Holds task ids only; the tasks themselves live in the task registry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Project {
    pub id: Uuid,
    pub request: String,
    /// Task ids in decomposition order, which is also execution order.
    pub task_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(request: impl Into<String>, task_ids: Vec<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            request: request.into(),
            task_ids,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateProjectRequest {
    pub project_request: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProjectCreated {
    pub project_id: Uuid,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProjectExecution {
    pub project_id: Uuid,
    pub tasks: Vec<Task>,
    /// Result text keyed by task id.
    pub results: HashMap<Uuid, String>,
}
