//! Persisted lifecycle status codes for articles and comments.
//!
//! The numeric codes are what the persistence layer stores; they are fixed
//! and must not be renumbered. `from_code` resolvers return `None` for
//! unknown codes so a corrupted row surfaces as an error instead of a bogus
//! state.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ArticleStatus
// ---------------------------------------------------------------------------

/// Article lifecycle stage.
///
/// Code 1 is reserved (an under-review stage that was planned and never
/// shipped); `from_code(1)` resolves to `None`.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArticleStatus {
    /// Initial stage, visible to the author only.
    Draft = 0,
    /// Publicly visible and listed.
    Published = 2,
    /// Hidden from listings, still reachable by direct link.
    Archived = 3,
}

impl ArticleStatus {
    /// Resolve a persisted status code to the enum variant.
    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Draft),
            2 => Some(Self::Published),
            3 => Some(Self::Archived),
            _ => None,
        }
    }

    /// The persisted status code.
    pub fn code(&self) -> i16 {
        *self as i16
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Published => "Published",
            Self::Archived => "Archived",
        }
    }

    /// Whether the article is reachable by readers other than the author.
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Published | Self::Archived)
    }
}

// ---------------------------------------------------------------------------
// CommentStatus
// ---------------------------------------------------------------------------

/// Comment lifecycle stage.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentStatus {
    /// Initial stage for every new comment, awaiting moderation.
    Pending = 0,
    /// Moderation passed, visible to readers.
    Approved = 1,
    /// Moderation failed. Terminal.
    Rejected = 2,
    /// Removed by its author. Terminal.
    UserDeleted = 3,
    /// Removed by a moderator. Terminal.
    AdminDeleted = 4,
}

impl CommentStatus {
    /// Resolve a persisted status code to the enum variant.
    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Pending),
            1 => Some(Self::Approved),
            2 => Some(Self::Rejected),
            3 => Some(Self::UserDeleted),
            4 => Some(Self::AdminDeleted),
            _ => None,
        }
    }

    /// The persisted status code.
    pub fn code(&self) -> i16 {
        *self as i16
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::UserDeleted => "Deleted by user",
            Self::AdminDeleted => "Deleted by moderator",
        }
    }

    /// Whether the comment appears to readers.
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Approved)
    }

    /// Whether the comment was soft-deleted (by either party).
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::UserDeleted | Self::AdminDeleted)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
