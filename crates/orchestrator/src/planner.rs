use std::sync::Arc;

use patterns_core::Plan;
use tracing::{debug, info};

use crate::error::{OrchestratorError, Result};
use crate::oracle::Oracle;
use crate::parser::parse_numbered_list;
use crate::prompts::PatternPrompts;

/// Turns a goal into an ordered list of steps with one oracle call.
///
/// Generation is side-effect free; storing the plan is a separate step.
#[derive(Clone)]
pub struct PlanGenerator {
    oracle: Arc<dyn Oracle>,
}

impl PlanGenerator {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    pub async fn generate(&self, goal: &str) -> Result<Plan> {
        let goal = goal.trim();
        if goal.is_empty() {
            return Err(OrchestratorError::Validation("Goal cannot be empty".to_string()));
        }

        let prompt = PatternPrompts::plan(goal);
        let reply = self.oracle.complete(prompt.system, &prompt.user).await?;
        let steps = parse_numbered_list(&reply);
        debug!(goal = %goal, reply_len = reply.len(), "Parsed plan reply");

        let plan = Plan::new(goal, steps)?;
        info!(goal = %goal, steps = plan.len(), "Plan generated");
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{OracleError, ScriptedOracle};
    use crate::prompts::PLANNER_SYSTEM;

    #[tokio::test]
    async fn test_generate_plan() {
        let oracle = Arc::new(
            ScriptedOracle::new().with_replies(["1. Preheat oven\n2. Mix batter\n3. Bake"]),
        );
        let planner = PlanGenerator::new(oracle.clone());

        let plan = planner.generate("Bake a cake").await.unwrap();

        assert_eq!(plan.goal, "Bake a cake");
        assert_eq!(plan.steps, vec!["Preheat oven", "Mix batter", "Bake"]);

        let calls = oracle.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system, PLANNER_SYSTEM);
        assert_eq!(calls[0].user, "Goal: Bake a cake");
    }

    #[tokio::test]
    async fn test_blank_goal_is_rejected_without_oracle_call() {
        let oracle = Arc::new(ScriptedOracle::new());
        let planner = PlanGenerator::new(oracle.clone());

        assert!(matches!(
            planner.generate("   ").await,
            Err(OrchestratorError::Validation(_))
        ));
        assert_eq!(oracle.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_oracle_failure_propagates() {
        let oracle = Arc::new(ScriptedOracle::new());
        oracle.fail_on_call(1, OracleError::EmptyResponse).await;
        let planner = PlanGenerator::new(oracle);

        assert!(matches!(
            planner.generate("Goal").await,
            Err(OrchestratorError::Oracle(OracleError::EmptyResponse))
        ));
    }
}
