//! The built-in side-effect handlers, one module per effect.

pub mod counters;
pub mod embedding;
pub mod notify;
pub mod stats;

pub use counters::CounterAdjuster;
pub use embedding::EmbeddingTrigger;
pub use notify::NotificationCreator;
pub use stats::StatsInitializer;
