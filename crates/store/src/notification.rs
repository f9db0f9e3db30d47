//! User notifications created by side-effect handlers.

use async_trait::async_trait;
use quill_core::types::{DbId, Timestamp};
use serde::Serialize;

use crate::error::StoreError;

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NotificationKind {
    /// Someone replied to the user's comment.
    CommentReply,
    /// The user was @-mentioned in a comment.
    Mention,
    /// The user's own comment passed moderation.
    CommentApproved,
}

/// One notification row.
///
/// There is deliberately no uniqueness over `(user_id, source_id)`:
/// duplicate replies produce duplicate notifications.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub kind: NotificationKind,
    /// Id of the triggering entity (a comment, for every current kind).
    pub source_id: DbId,
    pub is_read: bool,
    pub created_at: Timestamp,
}

/// Notification persistence collaborator. Fire-and-forget from the
/// handlers' perspective.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Create a notification for a user.
    async fn create(
        &self,
        user_id: DbId,
        kind: NotificationKind,
        source_id: DbId,
    ) -> Result<DbId, StoreError>;

    /// List a user's notifications, newest first.
    async fn list_for_user(&self, user_id: DbId) -> Result<Vec<Notification>, StoreError>;
}
