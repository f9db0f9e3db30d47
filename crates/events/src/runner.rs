//! Background dispatcher for side-effect handlers.
//!
//! [`SideEffectRunner`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! and fans every received event out to its registered handlers. Handler
//! concurrency is bounded by a semaphore; when every permit is taken the
//! handler runs inline on the dispatch task instead of being rejected
//! (bounded-pool-with-caller-runs). Handler failures are caught at the
//! handler boundary and logged, never propagated.

use std::sync::Arc;

use tokio::sync::{broadcast, Semaphore};
use tokio_util::sync::CancellationToken;

use crate::bus::EventEnvelope;
use crate::handler::SideEffectHandler;

/// Default bound on concurrently running handler invocations.
const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Dispatches domain events to side-effect handlers.
pub struct SideEffectRunner {
    handlers: Vec<Arc<dyn SideEffectHandler>>,
    permits: Arc<Semaphore>,
}

impl SideEffectRunner {
    /// Create a runner with a specific concurrency bound.
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            handlers: Vec::new(),
            permits: Arc::new(Semaphore::new(max_concurrency)),
        }
    }

    /// Register a handler. Every handler sees every event.
    pub fn register(mut self, handler: Arc<dyn SideEffectHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Run the dispatch loop until the bus closes or `cancel` fires.
    ///
    /// Subscribe before the first publish of interest; a broadcast
    /// receiver only sees events sent after it was created.
    pub async fn run(
        self: Arc<Self>,
        mut receiver: broadcast::Receiver<EventEnvelope>,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Side-effect runner cancelled, shutting down");
                    break;
                }
                received = receiver.recv() => match received {
                    Ok(envelope) => self.dispatch(envelope).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            skipped,
                            "Side-effect runner lagged, some events were not handled"
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Event bus closed, side-effect runner shutting down");
                        break;
                    }
                },
            }
        }
    }

    /// Fan one event out to every handler.
    async fn dispatch(&self, envelope: EventEnvelope) {
        for handler in &self.handlers {
            match self.permits.clone().try_acquire_owned() {
                Ok(permit) => {
                    let handler = Arc::clone(handler);
                    let event = envelope.event.clone();
                    tokio::spawn(async move {
                        Self::invoke(handler.as_ref(), &event).await;
                        drop(permit);
                    });
                }
                Err(_) => {
                    // Pool exhausted: degrade to synchronous execution on
                    // the dispatch task rather than dropping the effect.
                    tracing::debug!(
                        handler = handler.name(),
                        "Handler pool exhausted, running inline"
                    );
                    Self::invoke(handler.as_ref(), &envelope.event).await;
                }
            }
        }
    }

    /// Invoke one handler, catching and logging any failure.
    async fn invoke(handler: &dyn SideEffectHandler, event: &crate::bus::DomainEvent) {
        if let Err(error) = handler.handle(event).await {
            tracing::error!(
                handler = handler.name(),
                event_type = event.event_type(),
                error = %error,
                "Side-effect handler failed"
            );
        }
    }
}

impl Default for SideEffectRunner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENCY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
