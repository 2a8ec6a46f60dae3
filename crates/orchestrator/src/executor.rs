use std::sync::Arc;

use events::{Event, EventBus};
use patterns_core::{TaskExecution, TaskStatus};
use tracing::{error, info};
use uuid::Uuid;

use crate::error::{OrchestratorError, Result};
use crate::oracle::{complete_non_empty, Oracle};
use crate::prompts::PatternPrompts;
use crate::store::Registry;

/// Runs assigned tasks through the executor bound to their handler.
#[derive(Clone)]
pub struct ExecutionEngine {
    oracle: Arc<dyn Oracle>,
    registry: Arc<Registry>,
    event_bus: Option<EventBus>,
}

impl ExecutionEngine {
    pub fn new(oracle: Arc<dyn Oracle>, registry: Arc<Registry>) -> Self {
        Self {
            oracle,
            registry,
            event_bus: None,
        }
    }

    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    fn emit(&self, event: Event) {
        if let Some(ref bus) = self.event_bus {
            bus.emit(event);
        }
    }

    /// Execute one task.
    ///
    /// The task must exist and be `Assigned`. On oracle failure the task is
    /// left `Assigned` and the error is returned as-is.
    pub async fn execute(&self, task_id: Uuid) -> Result<TaskExecution> {
        let mut guard = self
            .registry
            .in_flight()
            .claim(task_id, self.event_bus.clone())
            .ok_or_else(|| OrchestratorError::invalid_state(task_id, "already executing"))?;

        let task = match self.registry.get_task(task_id).await {
            Ok(task) if task.status() == TaskStatus::Assigned => task,
            Ok(task) => {
                guard.disarm();
                return Err(OrchestratorError::invalid_state(
                    task_id,
                    format!("task is {}, expected assigned", task.status()),
                ));
            }
            Err(e) => {
                guard.disarm();
                return Err(e);
            }
        };

        let Some(handler) = task.handler() else {
            guard.disarm();
            return Err(OrchestratorError::invalid_state(
                task_id,
                "assigned task has no handler",
            ));
        };

        info!(task_id = %task_id, role = %handler, "Executing task");
        let prompt = PatternPrompts::execute(handler, task.description());

        let result = match complete_non_empty(self.oracle.as_ref(), &prompt).await {
            Ok(text) => text,
            Err(e) => {
                error!(task_id = %task_id, role = %handler, error = %e, "Task execution failed");
                guard.mark_failed(&e.to_string());
                return Err(OrchestratorError::task_failed(task_id, e));
            }
        };

        let completed = match self
            .registry
            .update_task(task_id, |t| t.complete(result.clone()))
            .await
        {
            Ok(task) => task,
            Err(e) => {
                guard.mark_failed(&e.to_string());
                return Err(e);
            }
        };
        guard.mark_completed();

        self.emit(Event::TaskCompleted {
            task_id,
            handler: handler.to_string(),
        });
        info!(task_id = %task_id, result_len = result.len(), "Task completed");

        Ok(TaskExecution::from_task(&completed, result))
    }

    /// Execute `task_ids` one after another in the given order.
    ///
    /// Stops at the first failure. Tasks completed before it stay completed.
    pub async fn execute_batch(&self, task_ids: &[Uuid]) -> Result<Vec<TaskExecution>> {
        let mut executions = Vec::with_capacity(task_ids.len());
        for (index, task_id) in task_ids.iter().enumerate() {
            match self.execute(*task_id).await {
                Ok(execution) => executions.push(execution),
                Err(e) => {
                    error!(
                        task_id = %task_id,
                        position = index + 1,
                        total = task_ids.len(),
                        "Batch aborted"
                    );
                    return Err(e);
                }
            }
        }
        Ok(executions)
    }

    /// Run a free-text step through the plan-step executor without touching
    /// the registry.
    pub async fn execute_step(&self, step: &str) -> Result<String> {
        let step = step.trim();
        if step.is_empty() {
            return Err(OrchestratorError::Validation("Task cannot be empty".to_string()));
        }

        let prompt = PatternPrompts::step(step);
        let result = complete_non_empty(self.oracle.as_ref(), &prompt).await?;
        info!(step_len = step.len(), result_len = result.len(), "Ad-hoc step executed");
        Ok(result)
    }
}
