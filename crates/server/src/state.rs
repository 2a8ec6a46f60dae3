use std::sync::{Arc, RwLock};

use events::EventBus;
use orchestrator::{Oracle, Orchestrator, OrchestratorConfig};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::routes::sse::{EventBuffer, SharedEventBuffer, DEFAULT_EVENT_BUFFER_SIZE};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub event_bus: EventBus,
    pub event_buffer: SharedEventBuffer,
}

impl AppState {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self::with_config(oracle, OrchestratorConfig::default())
    }

    pub fn with_config(oracle: Arc<dyn Oracle>, config: OrchestratorConfig) -> Self {
        let event_bus = EventBus::new();
        let event_buffer = Arc::new(RwLock::new(EventBuffer::new(DEFAULT_EVENT_BUFFER_SIZE)));
        let orchestrator = Orchestrator::new(oracle)
            .with_config(config)
            .with_event_bus(event_bus.clone());

        Self {
            orchestrator: Arc::new(orchestrator),
            event_bus,
            event_buffer,
        }
    }

    /// Copy every published event into the replay buffer until the bus closes.
    pub fn spawn_event_recorder(&self) -> JoinHandle<()> {
        let mut rx = self.event_bus.subscribe();
        let buffer = Arc::clone(&self.event_buffer);

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(envelope) => buffer
                        .write()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .push(envelope),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Event recorder lagged behind the bus");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}
