//! In-memory implementations of every collaborator trait.
//!
//! Used by the engine's tests and by deployments that have not wired a
//! real backend. Each store is an `RwLock`-guarded map with an atomic id
//! counter; clones go in and out so callers never alias the stored rows.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::content::{Article, Comment};
use quill_core::similarity::cosine_similarity;
use quill_core::status::ArticleStatus;
use quill_core::types::DbId;

use crate::content::{ArticleStore, CommentStore};
use crate::error::StoreError;
use crate::notification::{Notification, NotificationKind, NotificationStore};
use crate::stats::{ArticleStats, StatsStore};
use crate::users::UserDirectory;

// ---------------------------------------------------------------------------
// MemoryArticleStore
// ---------------------------------------------------------------------------

/// In-memory [`ArticleStore`].
pub struct MemoryArticleStore {
    rows: RwLock<HashMap<DbId, Article>>,
    next_id: AtomicI64,
}

impl MemoryArticleStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryArticleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArticleStore for MemoryArticleStore {
    async fn load(&self, id: DbId) -> Result<Option<Article>, StoreError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn insert(&self, article: &mut Article) -> Result<DbId, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        article.id = id;
        article.version = 1;
        self.rows.write().await.insert(id, article.clone());
        Ok(id)
    }

    async fn update(&self, article: &mut Article) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        let stored = rows.get(&article.id).ok_or(StoreError::NotFound {
            entity: "article",
            id: article.id,
        })?;

        if stored.version != article.version {
            return Err(StoreError::VersionConflict {
                entity: "article",
                id: article.id,
                expected: article.version,
                found: stored.version,
            });
        }

        article.version += 1;
        rows.insert(article.id, article.clone());
        Ok(())
    }

    async fn store_embedding(&self, id: DbId, embedding: Vec<f32>) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        let row = rows.get_mut(&id).ok_or(StoreError::NotFound {
            entity: "article",
            id,
        })?;
        row.embedding = Some(embedding);
        Ok(())
    }

    async fn list_recent_published(
        &self,
        exclude: DbId,
        limit: usize,
    ) -> Result<Vec<Article>, StoreError> {
        let rows = self.rows.read().await;
        let mut published: Vec<Article> = rows
            .values()
            .filter(|a| !a.deleted && a.status == ArticleStatus::Published && a.id != exclude)
            .cloned()
            .collect();
        published.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        published.truncate(limit);
        Ok(published)
    }

    async fn list_by_category(
        &self,
        category_id: DbId,
        exclude: DbId,
        limit: usize,
    ) -> Result<Vec<Article>, StoreError> {
        let rows = self.rows.read().await;
        let mut matches: Vec<Article> = rows
            .values()
            .filter(|a| {
                !a.deleted
                    && a.status == ArticleStatus::Published
                    && a.id != exclude
                    && a.category_id == Some(category_id)
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        matches.truncate(limit);
        Ok(matches)
    }

    async fn nearest_by_embedding(
        &self,
        embedding: &[f32],
        exclude: DbId,
        limit: usize,
    ) -> Result<Vec<Article>, StoreError> {
        let rows = self.rows.read().await;
        let mut scored: Vec<(f64, Article)> = rows
            .values()
            .filter(|a| {
                !a.deleted
                    && a.status == ArticleStatus::Published
                    && a.id != exclude
                    && a.has_embedding()
            })
            .map(|a| {
                let score = cosine_similarity(
                    embedding,
                    a.embedding.as_deref().unwrap_or_default(),
                );
                (score, a.clone())
            })
            .collect();

        scored.sort_by(|(x, _), (y, _)| y.partial_cmp(x).unwrap_or(std::cmp::Ordering::Equal));
        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(_, article)| article)
            .collect())
    }
}

// ---------------------------------------------------------------------------
// MemoryCommentStore
// ---------------------------------------------------------------------------

/// In-memory [`CommentStore`].
pub struct MemoryCommentStore {
    rows: RwLock<HashMap<DbId, Comment>>,
    next_id: AtomicI64,
}

impl MemoryCommentStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryCommentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommentStore for MemoryCommentStore {
    async fn load(&self, id: DbId) -> Result<Option<Comment>, StoreError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn insert(&self, comment: &mut Comment) -> Result<DbId, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        comment.id = id;
        comment.version = 1;
        self.rows.write().await.insert(id, comment.clone());
        Ok(id)
    }

    async fn update(&self, comment: &mut Comment) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        let stored = rows.get(&comment.id).ok_or(StoreError::NotFound {
            entity: "comment",
            id: comment.id,
        })?;

        if stored.version != comment.version {
            return Err(StoreError::VersionConflict {
                entity: "comment",
                id: comment.id,
                expected: comment.version,
                found: stored.version,
            });
        }

        comment.version += 1;
        rows.insert(comment.id, comment.clone());
        Ok(())
    }

    async fn adjust_like_count(&self, id: DbId, delta: i32) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        let row = rows.get_mut(&id).ok_or(StoreError::NotFound {
            entity: "comment",
            id,
        })?;
        row.like_count += delta;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryStatsStore
// ---------------------------------------------------------------------------

/// In-memory [`StatsStore`].
#[derive(Default)]
pub struct MemoryStatsStore {
    rows: RwLock<HashMap<DbId, ArticleStats>>,
}

#[async_trait]
impl StatsStore for MemoryStatsStore {
    async fn init(&self, article_id: DbId) -> Result<(), StoreError> {
        self.rows
            .write()
            .await
            .entry(article_id)
            .or_insert_with(|| ArticleStats::zeroed(article_id));
        Ok(())
    }

    async fn get(&self, article_id: DbId) -> Result<Option<ArticleStats>, StoreError> {
        Ok(self.rows.read().await.get(&article_id).cloned())
    }
}

// ---------------------------------------------------------------------------
// MemoryNotificationStore
// ---------------------------------------------------------------------------

/// In-memory [`NotificationStore`].
pub struct MemoryNotificationStore {
    rows: RwLock<Vec<Notification>>,
    next_id: AtomicI64,
}

impl MemoryNotificationStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryNotificationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn create(
        &self,
        user_id: DbId,
        kind: NotificationKind,
        source_id: DbId,
    ) -> Result<DbId, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.rows.write().await.push(Notification {
            id,
            user_id,
            kind,
            source_id,
            is_read: false,
            created_at: chrono::Utc::now(),
        });
        Ok(id)
    }

    async fn list_for_user(&self, user_id: DbId) -> Result<Vec<Notification>, StoreError> {
        let rows = self.rows.read().await;
        let mut matches: Vec<Notification> = rows
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(matches)
    }
}

// ---------------------------------------------------------------------------
// MemoryUserDirectory
// ---------------------------------------------------------------------------

/// In-memory [`UserDirectory`] seeded from a fixed username map.
#[derive(Default)]
pub struct MemoryUserDirectory {
    users: HashMap<String, DbId>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with `(username, user_id)` pairs.
    pub fn with_users(pairs: &[(&str, DbId)]) -> Self {
        Self {
            users: pairs
                .iter()
                .map(|(name, id)| (name.to_string(), *id))
                .collect(),
        }
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn ids_for_usernames(&self, usernames: &[String]) -> Result<Vec<DbId>, StoreError> {
        Ok(usernames
            .iter()
            .filter_map(|name| self.users.get(name).copied())
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
