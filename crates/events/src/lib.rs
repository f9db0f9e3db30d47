//! Event dispatch and side effects for the quill lifecycle engine.
//!
//! Building blocks:
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`DomainEvent`] / [`EventEnvelope`] — the typed event vocabulary.
//! - [`SideEffectRunner`] — bounded worker pool that fans events out to
//!   handlers, degrading to caller-runs on exhaustion.
//! - [`handlers`] — stats initialization, embedding trigger, notification
//!   creation, counter adjustment.

pub mod bus;
pub mod handler;
pub mod handlers;
pub mod runner;

pub use bus::{DomainEvent, EventBus, EventEnvelope};
pub use handler::{SideEffectError, SideEffectHandler};
pub use handlers::{CounterAdjuster, EmbeddingTrigger, NotificationCreator, StatsInitializer};
pub use runner::SideEffectRunner;
