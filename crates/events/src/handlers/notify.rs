//! Notification creation for replies, mentions, and approvals.

use std::sync::Arc;

use async_trait::async_trait;

use quill_store::notification::{NotificationKind, NotificationStore};

use crate::bus::DomainEvent;
use crate::handler::{SideEffectError, SideEffectHandler};

/// Creates one notification per target user for reply, mention, and
/// approval events.
///
/// Self-notification is skipped. There is no deduplication per
/// `(user, source)` pair: a duplicate reply event produces a duplicate
/// notification.
pub struct NotificationCreator {
    notifications: Arc<dyn NotificationStore>,
}

impl NotificationCreator {
    pub fn new(notifications: Arc<dyn NotificationStore>) -> Self {
        Self { notifications }
    }
}

#[async_trait]
impl SideEffectHandler for NotificationCreator {
    fn name(&self) -> &'static str {
        "notification-creator"
    }

    async fn handle(&self, event: &DomainEvent) -> Result<(), SideEffectError> {
        match event {
            DomainEvent::CommentReplied {
                comment_id,
                replied_user_id,
                replier_id,
                ..
            } => {
                if replied_user_id == replier_id {
                    tracing::debug!(comment_id, "Skipping self-reply notification");
                    return Ok(());
                }
                self.notifications
                    .create(*replied_user_id, NotificationKind::CommentReply, *comment_id)
                    .await?;
                tracing::info!(comment_id, user_id = replied_user_id, "Created reply notification");
                Ok(())
            }

            DomainEvent::UserMentioned {
                comment_id,
                mentioned_user_ids,
                mentioner_id,
            } => {
                for user_id in mentioned_user_ids {
                    if user_id == mentioner_id {
                        continue;
                    }
                    self.notifications
                        .create(*user_id, NotificationKind::Mention, *comment_id)
                        .await?;
                }
                tracing::info!(
                    comment_id,
                    mentioned = mentioned_user_ids.len(),
                    "Created mention notifications"
                );
                Ok(())
            }

            DomainEvent::CommentApproved {
                comment_id,
                author_id,
            } => {
                self.notifications
                    .create(*author_id, NotificationKind::CommentApproved, *comment_id)
                    .await?;
                Ok(())
            }

            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
