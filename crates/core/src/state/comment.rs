//! Comment lifecycle state machine.
//!
//! Legal transitions:
//!
//! ```text
//! Pending ──approve──► Approved
//!    │                    │
//!    ├─reject──► Rejected │
//!    │                    │
//!    └────delete──────────┴───► UserDeleted | AdminDeleted
//! ```
//!
//! `Rejected`, `UserDeleted` and `AdminDeleted` are terminal: every
//! operation on them fails with a state conflict, including a repeated
//! delete.

use crate::content::Comment;
use crate::error::CoreError;
use crate::state::Transition;
use crate::status::CommentStatus;

/// Per-stage view of a comment used to decide transitions.
///
/// Both deleted statuses resolve to the single [`Deleted`](Self::Deleted)
/// variant; they forbid the same operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentState {
    Pending,
    Approved,
    Rejected,
    Deleted,
}

impl CommentState {
    /// Resolve the state for a comment's persisted status.
    pub fn resolve(status: CommentStatus) -> Self {
        match status {
            CommentStatus::Pending => Self::Pending,
            CommentStatus::Approved => Self::Approved,
            CommentStatus::Rejected => Self::Rejected,
            CommentStatus::UserDeleted | CommentStatus::AdminDeleted => Self::Deleted,
        }
    }

    /// State name used in conflict errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Deleted => "Deleted",
        }
    }

    /// Whether this state admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Deleted)
    }

    /// Pass moderation, making the comment visible.
    pub fn approve(self, comment: &mut Comment) -> Result<Transition, CoreError> {
        match self {
            Self::Pending => {
                tracing::info!(comment_id = comment.id, "Pending -> Approved");
                comment.status = CommentStatus::Approved;
                comment.updated_at = chrono::Utc::now();
                Ok(Transition::Applied)
            }
            Self::Approved => {
                tracing::warn!(comment_id = comment.id, "Comment is already approved");
                Ok(Transition::Noop)
            }
            Self::Rejected | Self::Deleted => Err(self.conflict("approve")),
        }
    }

    /// Fail moderation, recording the reason.
    pub fn reject(self, comment: &mut Comment, reason: &str) -> Result<Transition, CoreError> {
        match self {
            Self::Pending => {
                tracing::info!(comment_id = comment.id, reason, "Pending -> Rejected");
                comment.status = CommentStatus::Rejected;
                comment.audit_reason = Some(reason.to_string());
                comment.updated_at = chrono::Utc::now();
                Ok(Transition::Applied)
            }
            Self::Approved | Self::Rejected | Self::Deleted => Err(self.conflict("reject")),
        }
    }

    /// The author removes their own comment.
    pub fn delete_by_user(self, comment: &mut Comment) -> Result<Transition, CoreError> {
        match self {
            Self::Pending | Self::Approved => {
                tracing::info!(
                    comment_id = comment.id,
                    from = self.name(),
                    "Comment deleted by author"
                );
                comment.status = CommentStatus::UserDeleted;
                comment.updated_at = chrono::Utc::now();
                Ok(Transition::Applied)
            }
            Self::Rejected | Self::Deleted => Err(self.conflict("delete")),
        }
    }

    /// A moderator removes the comment, recording the reason.
    pub fn delete_by_admin(
        self,
        comment: &mut Comment,
        reason: &str,
    ) -> Result<Transition, CoreError> {
        match self {
            Self::Pending | Self::Approved => {
                tracing::info!(
                    comment_id = comment.id,
                    from = self.name(),
                    reason,
                    "Comment deleted by moderator"
                );
                comment.status = CommentStatus::AdminDeleted;
                comment.audit_reason = Some(reason.to_string());
                comment.updated_at = chrono::Utc::now();
                Ok(Transition::Applied)
            }
            Self::Rejected | Self::Deleted => Err(self.conflict("delete")),
        }
    }

    fn conflict(&self, operation: &'static str) -> CoreError {
        CoreError::StateConflict {
            state: self.name(),
            operation,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
