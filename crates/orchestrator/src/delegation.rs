use std::sync::Arc;

use patterns_core::HandlerRole;
use tracing::{debug, info, warn};

use crate::oracle::{Oracle, OracleError};
use crate::parser::parse_numbered_list;
use crate::prompts::PatternPrompts;

/// Substring that selects each specialist in a classifier reply.
fn match_key(role: HandlerRole) -> &'static str {
    match role {
        HandlerRole::DevOpsEngineer => "DevOps",
        HandlerRole::TechnicalLead => "Technical Lead",
        HandlerRole::SoftwareEngineer => "Software Engineer",
        HandlerRole::StepExecutor => "Step Executor",
    }
}

/// Map a free-text classifier reply onto a specialist.
///
/// Specialists are checked in [`HandlerRole::SPECIALISTS`] order; the last one
/// is never matched and serves as the default. Total over every input.
pub fn normalize_role(reply: &str) -> HandlerRole {
    let (fallback, candidates) = match HandlerRole::SPECIALISTS.split_last() {
        Some(split) => split,
        None => return HandlerRole::SoftwareEngineer,
    };

    for role in candidates {
        if reply.contains(match_key(*role)) {
            return *role;
        }
    }

    if !reply.contains(match_key(*fallback)) {
        warn!(reply = %reply.trim(), fallback = %fallback, "Unrecognised role in classifier reply");
    }
    *fallback
}

/// Splits requests into tasks and picks a specialist for each one.
#[derive(Clone)]
pub struct DelegationEngine {
    oracle: Arc<dyn Oracle>,
}

impl DelegationEngine {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    /// Ask the oracle for a numbered task list. An empty list is valid.
    pub async fn decompose(&self, request: &str) -> Result<Vec<String>, OracleError> {
        let prompt = PatternPrompts::decompose(request);
        let reply = self.oracle.complete(prompt.system, &prompt.user).await?;

        let descriptions = parse_numbered_list(&reply);
        debug!(
            reply_len = reply.len(),
            tasks = descriptions.len(),
            "Decomposed project request"
        );
        Ok(descriptions)
    }

    /// Classify one task description. Only an oracle failure is an error.
    pub async fn classify(&self, description: &str) -> Result<HandlerRole, OracleError> {
        let prompt = PatternPrompts::classify(description);
        let reply = self.oracle.complete(prompt.system, &prompt.user).await?;

        let role = normalize_role(&reply);
        info!(role = %role, "Task classified");
        Ok(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::ScriptedOracle;

    #[test]
    fn test_devops_anywhere_wins() {
        assert_eq!(normalize_role("DevOps Engineer"), HandlerRole::DevOpsEngineer);
        assert_eq!(
            normalize_role("I think a DevOps person, or maybe a Technical Lead"),
            HandlerRole::DevOpsEngineer
        );
    }

    #[test]
    fn test_technical_lead_matches() {
        assert_eq!(
            normalize_role("The Technical Lead should own this."),
            HandlerRole::TechnicalLead
        );
    }

    #[test]
    fn test_unrecognised_reply_defaults_to_software_engineer() {
        assert_eq!(normalize_role("A designer"), HandlerRole::SoftwareEngineer);
        assert_eq!(normalize_role(""), HandlerRole::SoftwareEngineer);
        assert_eq!(normalize_role("devops"), HandlerRole::SoftwareEngineer);
        assert_eq!(normalize_role("Software Engineer"), HandlerRole::SoftwareEngineer);
    }

    #[test]
    fn test_never_returns_step_executor() {
        assert_eq!(normalize_role("Step Executor"), HandlerRole::SoftwareEngineer);
    }

    #[tokio::test]
    async fn test_decompose_parses_reply() {
        let oracle = Arc::new(ScriptedOracle::new().with_replies(["1. Design API\n\n2.Write code"]));
        let engine = DelegationEngine::new(oracle.clone());

        let tasks = engine.decompose("Build a service").await.unwrap();

        assert_eq!(tasks, vec!["Design API", "Write code"]);
        let calls = oracle.calls().await;
        assert!(calls[0].user.contains("Build a service"));
    }

    #[tokio::test]
    async fn test_decompose_blank_reply_is_empty_not_error() {
        let oracle = Arc::new(ScriptedOracle::new().with_replies(["\n   \n"]));
        let engine = DelegationEngine::new(oracle);

        assert!(engine.decompose("Nothing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_classify_propagates_oracle_failure() {
        let oracle = Arc::new(ScriptedOracle::new());
        oracle
            .fail_on_call(1, OracleError::Unavailable("down".into()))
            .await;
        let engine = DelegationEngine::new(oracle);

        assert!(matches!(
            engine.classify("anything").await,
            Err(OracleError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_classify_normalizes_reply() {
        let oracle = Arc::new(ScriptedOracle::new().with_replies(["Probably the DevOps team."]));
        let engine = DelegationEngine::new(oracle);

        assert_eq!(
            engine.classify("Set up CI").await.unwrap(),
            HandlerRole::DevOpsEngineer
        );
    }
}
