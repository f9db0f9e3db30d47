//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`DomainEvent`]s emitted
//! by the lifecycle services. Publishing is fire-and-forget: the caller's
//! request completes once the event is on the channel, never when the
//! subscribers finish.

use serde::Serialize;
use tokio::sync::broadcast;

use quill_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// DomainEvent
// ---------------------------------------------------------------------------

/// A typed domain event carrying the item id and the relevant actor ids.
///
/// Subscribers must tolerate at-least-once, out-of-order delivery across
/// distinct event types; no cross-type ordering is promised.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DomainEvent {
    /// An article became publicly visible for the first time or again.
    ArticlePublished { article_id: DbId, author_id: DbId },
    /// A published article's body changed; derived data must refresh.
    ArticleEdited { article_id: DbId },
    /// A comment passed moderation.
    CommentApproved { comment_id: DbId, author_id: DbId },
    /// A new comment replied to an existing one.
    CommentReplied {
        comment_id: DbId,
        parent_comment_id: DbId,
        replied_user_id: DbId,
        replier_id: DbId,
    },
    /// A comment @-mentioned one or more users.
    UserMentioned {
        comment_id: DbId,
        mentioned_user_ids: Vec<DbId>,
        mentioner_id: DbId,
    },
    /// A reader liked a comment.
    CommentLiked { comment_id: DbId, user_id: DbId },
    /// A reader withdrew a like.
    CommentUnliked { comment_id: DbId, user_id: DbId },
}

impl DomainEvent {
    /// Dot-separated event name used in logs.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ArticlePublished { .. } => "article.published",
            Self::ArticleEdited { .. } => "article.edited",
            Self::CommentApproved { .. } => "comment.approved",
            Self::CommentReplied { .. } => "comment.replied",
            Self::UserMentioned { .. } => "comment.mentioned",
            Self::CommentLiked { .. } => "comment.liked",
            Self::CommentUnliked { .. } => "comment.unliked",
        }
    }
}

/// A [`DomainEvent`] plus its emission timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventEnvelope {
    pub event: DomainEvent,
    /// When the event was published (UTC).
    pub timestamp: Timestamp,
}

impl EventEnvelope {
    pub fn new(event: DomainEvent) -> Self {
        Self {
            event,
            timestamp: chrono::Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so any number of subscribers can
/// independently receive every published event. Designed to be shared via
/// `Arc<EventBus>`.
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed envelopes are
    /// dropped and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With zero subscribers the event is silently dropped; emitting is
    /// never an error for the caller.
    pub fn publish(&self, event: DomainEvent) {
        tracing::debug!(event_type = event.event_type(), "Publishing event");
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(EventEnvelope::new(event));
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
