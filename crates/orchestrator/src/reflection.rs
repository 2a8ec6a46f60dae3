//! Generate/reflect loop.
//!
//! An initial answer is produced once, then rewritten by a fixed number of
//! critique rounds. Each round feeds on the previous round's output; there is
//! no convergence check.

use std::sync::Arc;

use events::{Event, EventBus};
use patterns_core::ReflectionResponse;
use tracing::{debug, info};

use crate::error::{OrchestratorError, Result};
use crate::oracle::{complete_non_empty, Oracle};
use crate::prompts::PatternPrompts;

#[derive(Clone)]
pub struct ReflectionLoop {
    oracle: Arc<dyn Oracle>,
    event_bus: Option<EventBus>,
}

impl ReflectionLoop {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self {
            oracle,
            event_bus: None,
        }
    }

    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub async fn generate_initial(&self, query: &str) -> Result<String> {
        let prompt = PatternPrompts::initial(query);
        let output = complete_non_empty(self.oracle.as_ref(), &prompt).await?;
        debug!(query_len = query.len(), output_len = output.len(), "Initial response generated");
        Ok(output)
    }

    pub async fn critique_and_rewrite(&self, query: &str, current: &str) -> Result<String> {
        let prompt = PatternPrompts::critique(query, current);
        Ok(complete_non_empty(self.oracle.as_ref(), &prompt).await?)
    }

    /// Run exactly `rounds` critique/rewrite rounds. Zero rounds returns
    /// `initial` unchanged without calling the oracle.
    pub async fn iterative_refine(&self, query: &str, initial: &str, rounds: u32) -> Result<String> {
        let mut current = initial.to_string();
        for round in 1..=rounds {
            current = self.critique_and_rewrite(query, &current).await?;
            debug!(round, of = rounds, output_len = current.len(), "Reflection round finished");

            if let Some(ref bus) = self.event_bus {
                bus.emit(Event::ReflectionRound { round, of: rounds });
            }
        }
        Ok(current)
    }

    /// Generate an initial answer to `query`, then refine it.
    pub async fn reflect(&self, query: &str, rounds: u32) -> Result<ReflectionResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(OrchestratorError::Validation("Query cannot be empty".to_string()));
        }

        info!(rounds, "Starting reflection");
        let initial_output = self.generate_initial(query).await?;
        let reflected_output = self.iterative_refine(query, &initial_output, rounds).await?;

        Ok(ReflectionResponse {
            query: query.to_string(),
            initial_output,
            reflected_output,
            iterations: rounds,
        })
    }
}
