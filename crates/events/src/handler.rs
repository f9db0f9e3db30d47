//! The side-effect handler contract.

use async_trait::async_trait;

use quill_store::embedding::EmbeddingError;
use quill_store::error::StoreError;

use crate::bus::DomainEvent;

/// Error type for side-effect handlers.
///
/// Handler errors never reach the request that emitted the event; the
/// runner catches them at the handler boundary and logs.
#[derive(Debug, thiserror::Error)]
pub enum SideEffectError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error("Side effect timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// One asynchronous side effect triggered by domain events.
///
/// Handlers receive every event and ignore the types they do not care
/// about. They must be idempotent or commutative: the same event may be
/// delivered more than once, and handlers for the same item may run
/// concurrently with each other.
#[async_trait]
pub trait SideEffectHandler: Send + Sync {
    /// Handler name used in logs.
    fn name(&self) -> &'static str;

    /// React to one event.
    async fn handle(&self, event: &DomainEvent) -> Result<(), SideEffectError>;
}
