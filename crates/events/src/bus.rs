use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::types::{Event, EventEnvelope};

const DEFAULT_CAPACITY: usize = 1024;

/// Fan-out channel for orchestrator lifecycle events.
///
/// Publishing never blocks and never fails: with no subscriber attached the
/// event is simply dropped. Subscribers that fall more than the channel
/// capacity behind observe `RecvError::Lagged` and skip ahead.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
    published: Arc<AtomicU64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            published: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Wrap `event` in a fresh envelope and publish it.
    pub fn emit(&self, event: Event) -> EventEnvelope {
        let envelope = EventEnvelope::new(event);
        self.publish(envelope.clone());
        envelope
    }

    /// Returns how many subscribers received the envelope.
    pub fn publish(&self, envelope: EventEnvelope) -> usize {
        self.published.fetch_add(1, Ordering::Relaxed);
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Events published before this call are not delivered.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Total envelopes published over the bus lifetime, delivered or not.
    pub fn published_count(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .field("published_count", &self.published_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::RecvError;
    use uuid::Uuid;

    fn task_created() -> Event {
        Event::TaskCreated {
            task_id: Uuid::new_v4(),
            description: "Set up CI".to_string(),
        }
    }

    #[tokio::test]
    async fn test_emit_wraps_and_delivers() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        let sent = bus.emit(task_created());

        let received = rx.recv().await.unwrap();
        assert_eq!(received.id, sent.id);
        assert_eq!(received.event.event_type(), "task.created");
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let envelope = EventEnvelope::new(task_created());
        let envelope_id = envelope.id;
        assert_eq!(bus.publish(envelope), 2);

        assert_eq!(rx1.recv().await.unwrap().id, envelope_id);
        assert_eq!(rx2.recv().await.unwrap().id, envelope_id);
    }

    #[test]
    fn test_no_subscribers_drops_event() {
        let bus = EventBus::new();

        assert_eq!(bus.publish(EventEnvelope::new(task_created())), 0);
        assert_eq!(bus.published_count(), 1);
    }

    #[tokio::test]
    async fn test_late_subscriber_misses_earlier_events() {
        let bus = EventBus::new();
        bus.emit(Event::PlanCompleted {
            goal: "early".to_string(),
        });

        let mut rx = bus.subscribe();
        bus.emit(Event::PlanCompleted {
            goal: "late".to_string(),
        });

        match rx.recv().await.unwrap().event {
            Event::PlanCompleted { goal } => assert_eq!(goal, "late"),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_slow_subscriber_lags() {
        let bus = EventBus::with_capacity(2);
        let mut rx = bus.subscribe();

        for _ in 0..4 {
            bus.emit(task_created());
        }

        assert!(matches!(rx.recv().await, Err(RecvError::Lagged(2))));
        assert!(rx.recv().await.is_ok());
    }

    #[test]
    fn test_clones_share_channel() {
        let bus1 = EventBus::new();
        let bus2 = bus1.clone();

        let _rx = bus2.subscribe();
        assert_eq!(bus1.subscriber_count(), 1);

        bus2.emit(task_created());
        assert_eq!(bus1.published_count(), 1);
    }
}
