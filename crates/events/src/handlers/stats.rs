//! Stats initialization for newly published articles.

use std::sync::Arc;

use async_trait::async_trait;

use quill_store::stats::StatsStore;

use crate::bus::DomainEvent;
use crate::handler::{SideEffectError, SideEffectHandler};

/// Creates a zeroed counters row when an article is published.
///
/// The store call has upsert semantics, so a redelivered publish event
/// (or a concurrent duplicate) leaves existing counters alone.
pub struct StatsInitializer {
    stats: Arc<dyn StatsStore>,
}

impl StatsInitializer {
    pub fn new(stats: Arc<dyn StatsStore>) -> Self {
        Self { stats }
    }
}

#[async_trait]
impl SideEffectHandler for StatsInitializer {
    fn name(&self) -> &'static str {
        "stats-init"
    }

    async fn handle(&self, event: &DomainEvent) -> Result<(), SideEffectError> {
        let DomainEvent::ArticlePublished { article_id, .. } = event else {
            return Ok(());
        };

        self.stats.init(*article_id).await?;
        tracing::info!(article_id, "Initialized article stats");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
