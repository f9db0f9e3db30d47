//! Persistence interfaces for the content aggregates.
//!
//! The engine assumes read-after-write consistency within a single
//! transition but does not manage transactions; a real backend maps these
//! traits onto its own repositories. Updates use optimistic concurrency:
//! the store compares the incoming `version` with the persisted one and
//! rejects stale writes with [`StoreError::VersionConflict`].

use async_trait::async_trait;
use quill_core::content::{Article, Comment};
use quill_core::types::DbId;

use crate::error::StoreError;

// ---------------------------------------------------------------------------
// ArticleStore
// ---------------------------------------------------------------------------

/// Article persistence collaborator.
///
/// Listing queries exclude soft-deleted rows; `load` does not, so deleted
/// items stay reachable by id.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Load an article by id, including soft-deleted ones.
    async fn load(&self, id: DbId) -> Result<Option<Article>, StoreError>;

    /// Persist a new article, assigning and returning its id.
    async fn insert(&self, article: &mut Article) -> Result<DbId, StoreError>;

    /// Persist changes to an existing article, bumping its version.
    async fn update(&self, article: &mut Article) -> Result<(), StoreError>;

    /// Attach a similarity vector without touching the version (the
    /// embedding handler runs concurrently with user edits and must not
    /// conflict with them).
    async fn store_embedding(&self, id: DbId, embedding: Vec<f32>) -> Result<(), StoreError>;

    /// Most recently published public articles, excluding `exclude`.
    async fn list_recent_published(
        &self,
        exclude: DbId,
        limit: usize,
    ) -> Result<Vec<Article>, StoreError>;

    /// Published articles in a category by recency, excluding `exclude`.
    async fn list_by_category(
        &self,
        category_id: DbId,
        exclude: DbId,
        limit: usize,
    ) -> Result<Vec<Article>, StoreError>;

    /// Published articles ranked nearest-first by vector similarity to
    /// `embedding`, excluding `exclude`.
    async fn nearest_by_embedding(
        &self,
        embedding: &[f32],
        exclude: DbId,
        limit: usize,
    ) -> Result<Vec<Article>, StoreError>;
}

// ---------------------------------------------------------------------------
// CommentStore
// ---------------------------------------------------------------------------

/// Comment persistence collaborator.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Load a comment by id, including soft-deleted ones.
    async fn load(&self, id: DbId) -> Result<Option<Comment>, StoreError>;

    /// Persist a new comment, assigning and returning its id.
    async fn insert(&self, comment: &mut Comment) -> Result<DbId, StoreError>;

    /// Persist changes to an existing comment, bumping its version.
    async fn update(&self, comment: &mut Comment) -> Result<(), StoreError>;

    /// Adjust the denormalized like counter by `delta`.
    ///
    /// Deliberately version-free: adjustments are commutative and may
    /// arrive out of order from concurrent handlers.
    async fn adjust_like_count(&self, id: DbId, delta: i32) -> Result<(), StoreError>;
}
