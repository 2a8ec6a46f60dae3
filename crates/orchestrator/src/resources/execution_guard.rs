//! In-flight execution tracking.
//!
//! A task may have at most one oracle call running for it. [`InFlightSet`]
//! hands out an [`ExecutionGuard`] per claimed task id; the claim is released
//! when the guard is dropped, whether the execution finished, failed or was
//! cancelled mid-await.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};
use uuid::Uuid;

use events::{Event, EventBus};

/// Task ids with an execution currently running.
///
/// Uses a blocking mutex so that [`ExecutionGuard`] can release its claim from
/// `Drop`. The lock is never held across an await.
#[derive(Debug, Default)]
pub struct InFlightSet {
    ids: Mutex<HashSet<Uuid>>,
}

impl InFlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<Uuid>> {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claim `task_id`. Returns `None` if another execution already holds it.
    pub fn claim(&self, task_id: Uuid, event_bus: Option<EventBus>) -> Option<ExecutionGuard<'_>> {
        if !self.lock().insert(task_id) {
            debug!(task_id = %task_id, "Execution already in flight");
            return None;
        }
        Some(ExecutionGuard::new(self, task_id, event_bus))
    }

    pub fn contains(&self, task_id: &Uuid) -> bool {
        self.lock().contains(task_id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn release(&self, task_id: &Uuid) {
        self.lock().remove(task_id);
    }
}

/// RAII claim on one task's execution slot.
///
/// When dropped without [`mark_completed`](Self::mark_completed) or
/// [`mark_failed`](Self::mark_failed), it publishes a
/// `task.execution_failed` event, since the execution was abandoned before
/// reaching an outcome.
///
/// # Example
///
/// ```ignore
/// let mut guard = in_flight.claim(task_id, bus).ok_or(..)?;
/// let result = oracle.complete(system, user).await?; // drop on error reports failure
/// guard.mark_completed();
/// ```
pub struct ExecutionGuard<'a> {
    set: &'a InFlightSet,
    task_id: Uuid,
    event_bus: Option<EventBus>,
    finished: bool,
}

impl<'a> ExecutionGuard<'a> {
    fn new(set: &'a InFlightSet, task_id: Uuid, event_bus: Option<EventBus>) -> Self {
        debug!(task_id = %task_id, "Execution guard acquired");
        Self {
            set,
            task_id,
            event_bus,
            finished: false,
        }
    }

    pub fn task_id(&self) -> Uuid {
        self.task_id
    }

    pub fn mark_completed(&mut self) {
        debug!(task_id = %self.task_id, "Execution marked as completed");
        self.finished = true;
    }

    /// Release the claim without reporting an outcome.
    ///
    /// For executions refused before any work started.
    pub fn disarm(&mut self) {
        self.finished = true;
    }

    /// Report the failure now and disarm the drop-time report.
    pub fn mark_failed(&mut self, error: &str) {
        debug!(task_id = %self.task_id, error = %error, "Execution marked as failed");
        self.emit_failure(error);
        self.finished = true;
    }

    fn emit_failure(&self, error: &str) {
        if let Some(ref bus) = self.event_bus {
            bus.emit(Event::TaskExecutionFailed {
                task_id: self.task_id,
                error: error.to_string(),
            });
        }
    }
}

impl Drop for ExecutionGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            warn!(
                task_id = %self.task_id,
                "Execution guard dropped before an outcome - reporting failure"
            );
            self.emit_failure("execution abandoned before completion");
        }
        self.set.release(&self.task_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_claim_is_refused_until_release() {
        let set = InFlightSet::new();
        let task_id = Uuid::new_v4();

        let mut guard = set.claim(task_id, None).unwrap();
        assert!(set.contains(&task_id));
        assert!(set.claim(task_id, None).is_none());

        guard.mark_completed();
        drop(guard);

        assert!(set.is_empty());
        assert!(set.claim(task_id, None).is_some());
    }

    #[test]
    fn test_claims_are_per_task() {
        let set = InFlightSet::new();
        let _a = set.claim(Uuid::new_v4(), None).unwrap();
        let _b = set.claim(Uuid::new_v4(), None).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[tokio::test]
    async fn test_drop_without_outcome_reports_failure() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        let set = InFlightSet::new();
        let task_id = Uuid::new_v4();

        {
            let _guard = set.claim(task_id, Some(bus.clone())).unwrap();
        }

        let envelope = rx.recv().await.unwrap();
        match envelope.event {
            Event::TaskExecutionFailed { task_id: id, .. } => assert_eq!(id, task_id),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(!set.contains(&task_id));
    }

    #[tokio::test]
    async fn test_mark_failed_reports_once() {
        let bus = EventBus::new();
        let _rx = bus.subscribe();
        let set = InFlightSet::new();

        {
            let mut guard = set.claim(Uuid::new_v4(), Some(bus.clone())).unwrap();
            guard.mark_failed("oracle unavailable");
        }

        assert_eq!(bus.published_count(), 1);
    }

    #[test]
    fn test_completed_guard_emits_nothing() {
        let bus = EventBus::new();
        let set = InFlightSet::new();

        {
            let mut guard = set.claim(Uuid::new_v4(), Some(bus.clone())).unwrap();
            guard.mark_completed();
        }

        assert_eq!(bus.published_count(), 0);
    }
}
