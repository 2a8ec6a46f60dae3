use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Oracle, OracleError};
use crate::prompts::{CLASSIFY_PREFIX, DECOMPOSE_PREFIX, PLANNER_SYSTEM, REACT_SYSTEM};

type Responder = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

/// One `(system, user)` pair seen by a [`ScriptedOracle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub system: String,
    pub user: String,
}

enum Failure {
    /// Fail the call with this 1-based index.
    OnCall(usize, OracleError),
    /// Fail every call whose user content contains the needle.
    Matching(String, OracleError),
}

#[derive(Default)]
struct Script {
    replies: VecDeque<String>,
    failures: Vec<Failure>,
    calls: Vec<RecordedCall>,
}

/// Deterministic oracle.
///
/// Queued replies are handed out first, in order; once the queue is empty the
/// responder computes a reply from the prompt. Failures take precedence over
/// both. Every call is recorded, including failed ones.
pub struct ScriptedOracle {
    script: Mutex<Script>,
    responder: Responder,
}

impl Default for ScriptedOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedOracle {
    /// Echoes the user content back.
    pub fn new() -> Self {
        Self::with_responder(|_, user| format!("Response to: {}", user))
    }

    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        Self {
            script: Mutex::new(Script::default()),
            responder: Arc::new(responder),
        }
    }

    /// Answers like a cooperative model: numbered lists for decomposition and
    /// planning, a specialist label for classification, prose otherwise.
    pub fn dry_run() -> Self {
        Self::with_responder(|system, user| {
            if user.starts_with(DECOMPOSE_PREFIX) || system == PLANNER_SYSTEM {
                "1. Clarify the requirements\n2. Design the solution\n3. Implement and verify"
                    .to_string()
            } else if user.starts_with(CLASSIFY_PREFIX) {
                "Software Engineer".to_string()
            } else if system == REACT_SYSTEM {
                format!(
                    "REASONING: [dry run]\nACTION: none\nOBSERVATION: no tools connected\nFINAL ANSWER: [dry run] {}",
                    user.lines().next().unwrap_or_default()
                )
            } else {
                let first_line = user.lines().next().unwrap_or_default();
                format!("[dry run] {}", first_line)
            }
        })
    }

    pub fn with_replies<I, S>(self, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let script = Script {
            replies: replies.into_iter().map(Into::into).collect(),
            ..Script::default()
        };
        Self {
            script: Mutex::new(script),
            responder: self.responder,
        }
    }

    /// Make the `n`-th call (1-based, counted over the oracle's lifetime) fail.
    pub async fn fail_on_call(&self, n: usize, error: OracleError) {
        self.script.lock().await.failures.push(Failure::OnCall(n, error));
    }

    /// Make every call whose user content contains `needle` fail.
    pub async fn fail_matching(&self, needle: impl Into<String>, error: OracleError) {
        self.script
            .lock()
            .await
            .failures
            .push(Failure::Matching(needle.into(), error));
    }

    pub async fn clear_failures(&self) {
        self.script.lock().await.failures.clear();
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.script.lock().await.calls.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.script.lock().await.calls.len()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn complete(&self, system: &str, user: &str) -> Result<String, OracleError> {
        let mut script = self.script.lock().await;
        script.calls.push(RecordedCall {
            system: system.to_string(),
            user: user.to_string(),
        });
        let call_number = script.calls.len();

        let failure = script.failures.iter().find_map(|failure| match failure {
            Failure::OnCall(n, err) if *n == call_number => Some(err.clone()),
            Failure::Matching(needle, err) if user.contains(needle.as_str()) => Some(err.clone()),
            _ => None,
        });
        if let Some(err) = failure {
            return Err(err);
        }

        match script.replies.pop_front() {
            Some(reply) => Ok(reply),
            None => Ok((self.responder)(system, user)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queued_replies_then_responder() {
        let oracle = ScriptedOracle::new().with_replies(["first", "second"]);

        assert_eq!(oracle.complete("s", "a").await.unwrap(), "first");
        assert_eq!(oracle.complete("s", "b").await.unwrap(), "second");
        assert_eq!(oracle.complete("s", "c").await.unwrap(), "Response to: c");
        assert_eq!(oracle.call_count().await, 3);
    }

    #[tokio::test]
    async fn test_fail_on_call_only_hits_that_call() {
        let oracle = ScriptedOracle::new();
        oracle
            .fail_on_call(2, OracleError::Unavailable("down".into()))
            .await;

        assert!(oracle.complete("s", "1").await.is_ok());
        assert!(oracle.complete("s", "2").await.is_err());
        assert!(oracle.complete("s", "3").await.is_ok());
    }

    #[tokio::test]
    async fn test_fail_matching_does_not_consume_replies() {
        let oracle = ScriptedOracle::new().with_replies(["kept"]);
        oracle
            .fail_matching("boom", OracleError::EmptyResponse)
            .await;

        assert_eq!(
            oracle.complete("s", "boom now").await,
            Err(OracleError::EmptyResponse)
        );
        assert_eq!(oracle.complete("s", "fine").await.unwrap(), "kept");
    }

    #[tokio::test]
    async fn test_records_calls() {
        let oracle = ScriptedOracle::new();
        oracle.complete("sys", "usr").await.unwrap();

        assert_eq!(
            oracle.calls().await,
            vec![RecordedCall {
                system: "sys".to_string(),
                user: "usr".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_dry_run_answers_by_prompt_kind() {
        let oracle = ScriptedOracle::dry_run();

        let list = oracle
            .complete("pm", &format!("{} x", DECOMPOSE_PREFIX))
            .await
            .unwrap();
        assert!(list.starts_with("1. "));

        let label = oracle
            .complete("pm", &format!("{} x", CLASSIFY_PREFIX))
            .await
            .unwrap();
        assert_eq!(label, "Software Engineer");

        let transcript = oracle.complete(REACT_SYSTEM, "Why is the sky blue?").await.unwrap();
        assert_eq!(
            crate::parser::final_answer(&transcript),
            "[dry run] Why is the sky blue?"
        );
    }
}
