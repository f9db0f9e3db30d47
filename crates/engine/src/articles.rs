//! Article lifecycle orchestration.
//!
//! Flow per operation: load, resolve the state, apply the transition,
//! persist, emit. The pipeline runs before any persistence on create and
//! edit, so a stage failure leaves nothing half-written. Events are
//! emitted only when a transition actually changed something — a no-op
//! re-publish emits nothing.

use std::sync::Arc;

use quill_core::content::Article;
use quill_core::error::CoreError;
use quill_core::pipeline::Pipeline;
use quill_core::state::ArticleState;
use quill_core::status::ArticleStatus;
use quill_core::types::DbId;
use quill_events::{DomainEvent, EventBus};
use quill_store::content::ArticleStore;

use crate::error::EngineResult;

/// Input for creating an article.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub author_id: DbId,
    pub title: String,
    pub raw_body: String,
    pub category_id: Option<DbId>,
    /// Optional hand-written summary; suppresses the extracted one.
    pub summary: Option<String>,
}

/// Orchestrates article creation and status transitions.
pub struct ArticleLifecycle {
    store: Arc<dyn ArticleStore>,
    bus: Arc<EventBus>,
    pipeline: Pipeline,
}

impl ArticleLifecycle {
    pub fn new(store: Arc<dyn ArticleStore>, bus: Arc<EventBus>) -> Self {
        Self {
            store,
            bus,
            pipeline: Pipeline::articles(),
        }
    }

    /// Create a draft from raw markdown.
    ///
    /// Runs the article pipeline first; a stage failure surfaces before
    /// anything is persisted.
    pub async fn create(&self, input: NewArticle) -> EngineResult<Article> {
        let processed = self.pipeline.process(&input.raw_body)?;

        let mut article = Article::new(input.author_id, input.title, input.raw_body);
        article.category_id = input.category_id;
        article.rendered_body = Some(processed.rendered_body);
        article.outline = processed.outline;
        article.summary = input
            .summary
            .filter(|s| !s.trim().is_empty())
            .or(processed.summary);

        self.store.insert(&mut article).await?;
        tracing::info!(article_id = article.id, title = %article.title, "Created article");
        Ok(article)
    }

    /// Replace the body, re-deriving rendered content, outline and
    /// summary.
    ///
    /// Editing a published article emits [`DomainEvent::ArticleEdited`] so
    /// the embedding refreshes; drafts refresh on publication anyway.
    pub async fn edit_body(&self, article_id: DbId, raw_body: &str) -> EngineResult<Article> {
        let mut article = self.load(article_id).await?;
        let processed = self.pipeline.process(raw_body)?;

        article.raw_body = raw_body.to_string();
        article.rendered_body = Some(processed.rendered_body);
        article.outline = processed.outline;
        article.summary = processed.summary;
        article.updated_at = chrono::Utc::now();

        self.store.update(&mut article).await?;
        tracing::info!(article_id, "Edited article body");

        if article.status == ArticleStatus::Published {
            self.bus.publish(DomainEvent::ArticleEdited { article_id });
        }
        Ok(article)
    }

    /// Publish a draft (or unarchived) article.
    pub async fn publish(&self, article_id: DbId) -> EngineResult<Article> {
        let mut article = self.load(article_id).await?;
        self.guard_not_deleted(&article, "publish")?;

        // A public article must always have a rendered body.
        if article.rendered_body.is_none() {
            return Err(CoreError::Validation(
                "Article has no rendered body; re-run content processing before publishing"
                    .to_string(),
            )
            .into());
        }

        let state = ArticleState::resolve(article.status);
        let transition = state.publish(&mut article)?;

        if transition.changed() {
            self.store.update(&mut article).await?;
            self.bus.publish(DomainEvent::ArticlePublished {
                article_id,
                author_id: article.author_id,
            });
        }
        Ok(article)
    }

    /// Archive a published article, removing it from listings.
    pub async fn archive(&self, article_id: DbId) -> EngineResult<Article> {
        let mut article = self.load(article_id).await?;
        self.guard_not_deleted(&article, "archive")?;

        let state = ArticleState::resolve(article.status);
        if state.archive(&mut article)?.changed() {
            self.store.update(&mut article).await?;
        }
        Ok(article)
    }

    /// Restore an archived article to the published stage.
    pub async fn unarchive(&self, article_id: DbId) -> EngineResult<Article> {
        let mut article = self.load(article_id).await?;
        self.guard_not_deleted(&article, "unarchive")?;

        let state = ArticleState::resolve(article.status);
        if state.unarchive(&mut article)?.changed() {
            self.store.update(&mut article).await?;
        }
        Ok(article)
    }

    /// Soft-delete the article.
    ///
    /// The row stays loadable by id but drops out of every listing.
    /// Deleting an already deleted article is a no-op.
    pub async fn delete(&self, article_id: DbId, reason: Option<String>) -> EngineResult<()> {
        let mut article = self.load(article_id).await?;
        if article.deleted {
            tracing::warn!(article_id, "Article is already deleted");
            return Ok(());
        }

        let state = ArticleState::resolve(article.status);
        if !state.can_delete(&article) {
            return Err(CoreError::StateConflict {
                state: state.name(),
                operation: "delete",
            }
            .into());
        }

        article.deleted = true;
        article.audit_reason = reason;
        article.updated_at = chrono::Utc::now();
        self.store.update(&mut article).await?;
        tracing::info!(article_id, "Soft-deleted article");
        Ok(())
    }

    async fn load(&self, article_id: DbId) -> EngineResult<Article> {
        self.store
            .load(article_id)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "article",
                    id: article_id,
                }
                .into()
            })
    }

    fn guard_not_deleted(&self, article: &Article, operation: &'static str) -> EngineResult<()> {
        if article.deleted {
            return Err(CoreError::StateConflict {
                state: "Deleted",
                operation,
            }
            .into());
        }
        Ok(())
    }
}
