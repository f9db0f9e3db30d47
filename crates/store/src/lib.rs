//! Narrow interfaces to the subsystems the lifecycle engine does not own:
//! persistence, the embedding service, notifications, and username
//! resolution — plus in-memory implementations of each.
//!
//! A real deployment maps the traits here onto its database and external
//! services; the engine never sees anything but these seams.

pub mod content;
pub mod embedding;
pub mod error;
pub mod memory;
pub mod notification;
pub mod stats;
pub mod users;

pub use content::{ArticleStore, CommentStore};
pub use embedding::{EmbeddingError, EmbeddingProvider, MockEmbeddingProvider};
pub use error::StoreError;
pub use memory::{
    MemoryArticleStore, MemoryCommentStore, MemoryNotificationStore, MemoryStatsStore,
    MemoryUserDirectory,
};
pub use notification::{Notification, NotificationKind, NotificationStore};
pub use stats::{ArticleStats, StatsStore};
pub use users::UserDirectory;
