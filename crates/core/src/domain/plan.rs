use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::CoreError;

/// An ordered decomposition of a goal into steps.
///
/// A `Plan` is a plain value: generating one has no effect on any registry
/// until it is explicitly stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Plan {
    /// The goal text. Stored plans are keyed by it.
    pub goal: String,
    /// Step descriptions in execution order.
    pub steps: Vec<String>,
}

impl Plan {
    /// The goal is stored trimmed and doubles as the plan's key.
    pub fn new(goal: impl Into<String>, steps: Vec<String>) -> Result<Self, CoreError> {
        let goal = goal.into().trim().to_string();
        if goal.is_empty() {
            return Err(CoreError::Validation("Goal cannot be empty".to_string()));
        }
        Ok(Self { goal, steps })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// A stored plan as seen by callers.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlanView {
    pub goal: String,
    pub steps: Vec<String>,
    /// Set once every step has run through the bulk execution path.
    pub completed: bool,
}

/// Outcome of running every step of a stored plan.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlanExecution {
    pub goal: String,
    pub steps: Vec<String>,
    /// One result per step, in step order.
    pub results: Vec<String>,
    pub completed: bool,
}

/// Result of running a single free-text step outside any stored plan.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StepExecution {
    pub task: String,
    pub result: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GeneratePlanRequest {
    pub goal: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExecutePlanRequest {
    pub goal: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExecuteStepRequest {
    pub task: String,
}

/// Response of the generate/refine cycle.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReflectionResponse {
    pub query: String,
    pub initial_output: String,
    pub reflected_output: String,
    pub iterations: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_creation() {
        let plan = Plan::new(
            "Bake a cake",
            vec!["Preheat oven".to_string(), "Mix batter".to_string()],
        )
        .unwrap();

        assert_eq!(plan.goal, "Bake a cake");
        assert_eq!(plan.len(), 2);
        assert!(!plan.is_empty());
    }

    #[test]
    fn test_plan_goal_is_trimmed() {
        let plan = Plan::new("  Bake a cake \n", Vec::new()).unwrap();
        assert_eq!(plan.goal, "Bake a cake");
    }

    #[test]
    fn test_plan_may_have_no_steps() {
        let plan = Plan::new("Do nothing", Vec::new()).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_plan_rejects_blank_goal() {
        assert!(matches!(
            Plan::new(" ", Vec::new()),
            Err(CoreError::Validation(_))
        ));
    }
}
