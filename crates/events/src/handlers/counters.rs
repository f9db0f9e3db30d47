//! Denormalized like-counter maintenance.

use std::sync::Arc;

use async_trait::async_trait;

use quill_store::content::CommentStore;

use crate::bus::DomainEvent;
use crate::handler::{SideEffectError, SideEffectHandler};

/// Adjusts the comment like counter for like/unlike events.
///
/// Adjustments are commutative (+1/-1), so concurrent or out-of-order
/// delivery converges on the correct net count.
pub struct CounterAdjuster {
    comments: Arc<dyn CommentStore>,
}

impl CounterAdjuster {
    pub fn new(comments: Arc<dyn CommentStore>) -> Self {
        Self { comments }
    }
}

#[async_trait]
impl SideEffectHandler for CounterAdjuster {
    fn name(&self) -> &'static str {
        "counter-adjuster"
    }

    async fn handle(&self, event: &DomainEvent) -> Result<(), SideEffectError> {
        let (comment_id, delta) = match event {
            DomainEvent::CommentLiked { comment_id, .. } => (*comment_id, 1),
            DomainEvent::CommentUnliked { comment_id, .. } => (*comment_id, -1),
            _ => return Ok(()),
        };

        self.comments.adjust_like_count(comment_id, delta).await?;
        tracing::debug!(comment_id, delta, "Adjusted like counter");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
