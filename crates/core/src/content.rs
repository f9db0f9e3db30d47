//! The two content aggregates subject to lifecycle management.
//!
//! Both carry a raw markdown body as the source of truth plus fields the
//! processing pipeline derives from it. `status` is mutated only by the
//! state machines in [`crate::state`]; everything else is plain data.

use serde::{Deserialize, Serialize};

use crate::status::{ArticleStatus, CommentStatus};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Article
// ---------------------------------------------------------------------------

/// A blog article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Assigned by the store on first save; 0 until then.
    pub id: DbId,
    pub author_id: DbId,
    pub title: String,
    pub category_id: Option<DbId>,

    /// Author-supplied markdown, the source of truth for edits.
    pub raw_body: String,
    /// Derived by the pipeline, never hand-edited.
    pub rendered_body: Option<String>,
    /// Derived, unless the author supplied one explicitly.
    pub summary: Option<String>,
    /// JSON-encoded heading outline, derived.
    pub outline: Option<String>,

    pub status: ArticleStatus,
    pub published_at: Option<Timestamp>,

    /// Similarity vector, produced asynchronously after publication.
    pub embedding: Option<Vec<f32>>,

    /// Set only by the delete transition.
    pub audit_reason: Option<String>,
    /// Soft-delete marker; deleted articles stay loadable by id but are
    /// excluded from listings.
    pub deleted: bool,

    /// Optimistic-concurrency version, bumped by the store on every
    /// update. A stale version on write is a conflict, not an overwrite.
    pub version: i64,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Article {
    /// Create a new draft with derived fields unset.
    pub fn new(author_id: DbId, title: impl Into<String>, raw_body: impl Into<String>) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: 0,
            author_id,
            title: title.into(),
            category_id: None,
            raw_body: raw_body.into(),
            rendered_body: None,
            summary: None,
            outline: None,
            status: ArticleStatus::Draft,
            published_at: None,
            embedding: None,
            audit_reason: None,
            deleted: false,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a similarity vector has been generated for this article.
    pub fn has_embedding(&self) -> bool {
        self.embedding.as_ref().is_some_and(|v| !v.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Comment
// ---------------------------------------------------------------------------

/// A reader comment, threaded below an article.
///
/// `depth`, `path` and `root_id` denormalize the thread position for
/// subtree queries; they must stay consistent with `parent_id` at all
/// times. For a reply, `depth = parent.depth + 1` and
/// `path = parent.path + "/" + id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Assigned by the store on first save; 0 until then.
    pub id: DbId,
    pub article_id: DbId,
    pub author_id: DbId,

    /// Author-supplied markdown, the source of truth for edits.
    pub raw_body: String,
    /// Derived by the pipeline.
    pub rendered_body: Option<String>,

    pub status: CommentStatus,

    /// Thread position. `parent_id` is `None` for a root comment, in which
    /// case `depth` is 0, `root_id` is the comment's own id and `path` is
    /// `"/" + id`.
    pub parent_id: Option<DbId>,
    pub depth: i32,
    pub path: String,
    pub root_id: DbId,

    /// Direct replies, maintained by the lifecycle service.
    pub reply_count: i32,
    /// Likes, adjusted asynchronously by the counter handler.
    pub like_count: i32,

    /// Set only by the reject and admin-delete transitions.
    pub audit_reason: Option<String>,

    /// Optimistic-concurrency version, bumped by the store on every
    /// update.
    pub version: i64,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Comment {
    /// Create a new pending comment with no thread position assigned yet.
    pub fn new(article_id: DbId, author_id: DbId, raw_body: impl Into<String>) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: 0,
            article_id,
            author_id,
            raw_body: raw_body.into(),
            rendered_body: None,
            status: CommentStatus::Pending,
            parent_id: None,
            depth: 0,
            path: String::new(),
            root_id: 0,
            reply_count: 0,
            like_count: 0,
            audit_reason: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_article_is_unsaved_draft() {
        let article = Article::new(7, "Title", "body");
        assert_eq!(article.id, 0);
        assert_eq!(article.status, ArticleStatus::Draft);
        assert!(article.published_at.is_none());
        assert!(!article.has_embedding());
    }

    #[test]
    fn empty_embedding_does_not_count() {
        let mut article = Article::new(7, "Title", "body");
        article.embedding = Some(Vec::new());
        assert!(!article.has_embedding());
        article.embedding = Some(vec![0.5, 0.5]);
        assert!(article.has_embedding());
    }

    #[test]
    fn new_comment_is_pending() {
        let comment = Comment::new(1, 2, "hello");
        assert_eq!(comment.status, CommentStatus::Pending);
        assert_eq!(comment.depth, 0);
        assert!(comment.parent_id.is_none());
    }
}
