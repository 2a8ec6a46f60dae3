use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};
use serde::Deserialize;
use tokio_stream::wrappers::BroadcastStream;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::state::AppState;

pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 1000;
pub const SSE_KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize, IntoParams)]
pub struct EventsQuery {
    /// Comma-separated task IDs. Events not tied to a task always pass.
    pub task_ids: Option<String>,
}

/// Bounded history of published events for `Last-Event-ID` replay.
pub struct EventBuffer {
    events: VecDeque<events::EventEnvelope>,
    max_size: usize,
}

impl EventBuffer {
    pub fn new(max_size: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    pub fn push(&mut self, envelope: events::EventEnvelope) {
        if self.events.len() >= self.max_size {
            self.events.pop_front();
        }
        self.events.push_back(envelope);
    }

    /// Events recorded after `event_id`. Empty if the id is unknown or evicted.
    pub fn events_after(&self, event_id: Uuid) -> Vec<events::EventEnvelope> {
        match self.events.iter().position(|e| e.id == event_id) {
            Some(index) => self.events.iter().skip(index + 1).cloned().collect(),
            None => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

pub type SharedEventBuffer = Arc<RwLock<EventBuffer>>;

fn parse_task_ids(task_ids: Option<&str>) -> Option<Vec<Uuid>> {
    task_ids.map(|s| {
        s.split(',')
            .filter_map(|id| id.trim().parse().ok())
            .collect()
    })
}

fn passes_filter(envelope: &events::EventEnvelope, task_ids: Option<&[Uuid]>) -> bool {
    match (task_ids, envelope.event.task_id()) {
        (Some(ids), Some(task_id)) => ids.contains(&task_id),
        _ => true,
    }
}

fn envelope_to_sse_event(envelope: &events::EventEnvelope) -> Result<Event, Infallible> {
    let data = serde_json::to_string(&envelope).unwrap_or_else(|_| "{}".to_string());

    Ok(Event::default()
        .id(envelope.id.to_string())
        .event(envelope.event.event_type())
        .data(data))
}

#[utoipa::path(
    get,
    path = "/api/events",
    params(EventsQuery),
    responses(
        (status = 200, description = "SSE event stream"),
    ),
    tag = "events"
)]
pub async fn events_stream(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
    headers: axum::http::HeaderMap,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let task_ids = parse_task_ids(query.task_ids.as_deref());
    let last_event_id = headers
        .get("Last-Event-ID")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<Uuid>().ok());

    // Subscribe before reading the buffer so nothing falls between the two.
    let rx = state.event_bus.subscribe();

    let missed_events = match last_event_id {
        Some(event_id) => state
            .event_buffer
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .events_after(event_id),
        None => Vec::new(),
    };

    let replay_filter = task_ids.clone();
    let missed_stream = futures::stream::iter(
        missed_events
            .into_iter()
            .filter(move |e| passes_filter(e, replay_filter.as_deref()))
            .map(|e| envelope_to_sse_event(&e)),
    );

    let live_stream = BroadcastStream::new(rx).filter_map(move |result| {
        let task_ids = task_ids.clone();
        async move {
            match result {
                Ok(envelope) if passes_filter(&envelope, task_ids.as_deref()) => {
                    Some(envelope_to_sse_event(&envelope))
                }
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!("SSE broadcast error: {:?}", e);
                    None
                }
            }
        }
    });

    Sse::new(missed_stream.chain(live_stream)).keep_alive(
        KeepAlive::new()
            .interval(SSE_KEEP_ALIVE_INTERVAL)
            .text("keep-alive"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use events::EventEnvelope;

    fn task_created(description: &str) -> EventEnvelope {
        EventEnvelope::new(events::Event::TaskCreated {
            task_id: Uuid::new_v4(),
            description: description.to_string(),
        })
    }

    #[test]
    fn test_parse_task_ids() {
        assert!(parse_task_ids(None).is_none());
        assert!(parse_task_ids(Some("")).unwrap().is_empty());

        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let parsed = parse_task_ids(Some(&format!("{} , invalid,{}", a, b))).unwrap();
        assert_eq!(parsed, vec![a, b]);
    }

    #[test]
    fn test_filter_keeps_events_without_task() {
        let plan = EventEnvelope::new(events::Event::PlanCompleted {
            goal: "g".to_string(),
        });
        let task = task_created("t");
        let other = [Uuid::new_v4()];

        assert!(passes_filter(&plan, Some(&other)));
        assert!(!passes_filter(&task, Some(&other)));
        assert!(passes_filter(&task, None));
    }

    #[test]
    fn test_event_buffer_events_after() {
        let mut buffer = EventBuffer::new(3);
        let e1 = task_created("1");
        let e2 = task_created("2");
        let e3 = task_created("3");
        let (id1, id2, id3) = (e1.id, e2.id, e3.id);

        buffer.push(e1);
        buffer.push(e2);
        buffer.push(e3);

        let after_first = buffer.events_after(id1);
        assert_eq!(after_first.len(), 2);
        assert_eq!(after_first[0].id, id2);
        assert!(buffer.events_after(id3).is_empty());
        assert!(buffer.events_after(Uuid::new_v4()).is_empty());
    }

    #[test]
    fn test_event_buffer_evicts_oldest() {
        let mut buffer = EventBuffer::new(2);
        let e1 = task_created("1");
        let e2 = task_created("2");
        let e3 = task_created("3");
        let (id1, id2, id3) = (e1.id, e2.id, e3.id);

        buffer.push(e1);
        buffer.push(e2);
        buffer.push(e3);

        assert_eq!(buffer.len(), 2);
        assert!(buffer.events_after(id1).is_empty());
        let after_e2 = buffer.events_after(id2);
        assert_eq!(after_e2.len(), 1);
        assert_eq!(after_e2[0].id, id3);
    }

    #[test]
    fn test_envelope_to_sse_event_does_not_panic() {
        let _event = envelope_to_sse_event(&task_created("Test")).unwrap();
    }
}
