//! Per-article counters row.

use async_trait::async_trait;
use quill_core::types::{DbId, Timestamp};
use serde::Serialize;

use crate::error::StoreError;

/// Denormalized counters for one article.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleStats {
    pub article_id: DbId,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub created_at: Timestamp,
}

impl ArticleStats {
    /// A zeroed row for a freshly published article.
    pub fn zeroed(article_id: DbId) -> Self {
        Self {
            article_id,
            view_count: 0,
            like_count: 0,
            comment_count: 0,
            created_at: chrono::Utc::now(),
        }
    }
}

/// Stats persistence collaborator.
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Ensure a counters row exists for the article.
    ///
    /// Upsert semantics: running twice leaves existing counters intact,
    /// so the stats-initializer handler is safe under at-least-once
    /// delivery.
    async fn init(&self, article_id: DbId) -> Result<(), StoreError>;

    /// Read the counters row, if one exists.
    async fn get(&self, article_id: DbId) -> Result<Option<ArticleStats>, StoreError>;
}
