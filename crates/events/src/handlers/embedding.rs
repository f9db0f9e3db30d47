//! Embedding generation trigger.
//!
//! Requests a similarity vector from the external embedding provider when
//! an article is published or edited. The call is time-bounded and
//! best-effort: a failure or timeout is logged and swallowed, leaving the
//! article published with degraded recommendation quality rather than
//! failing anything user-visible.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use quill_core::types::DbId;
use quill_store::content::ArticleStore;
use quill_store::embedding::EmbeddingProvider;

use crate::bus::DomainEvent;
use crate::handler::{SideEffectError, SideEffectHandler};

/// Time budget for one embedding request. Exceeding it counts as failure.
const EMBEDDING_BUDGET: Duration = Duration::from_secs(10);

/// Number of body characters included in the embedding input alongside the
/// title and summary.
const BODY_PREFIX_CHARS: usize = 2000;

/// Requests vector generation for published or edited articles.
pub struct EmbeddingTrigger {
    articles: Arc<dyn ArticleStore>,
    provider: Arc<dyn EmbeddingProvider>,
    budget: Duration,
}

impl EmbeddingTrigger {
    pub fn new(articles: Arc<dyn ArticleStore>, provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self::with_budget(articles, provider, EMBEDDING_BUDGET)
    }

    /// Override the time budget (tests use a short one).
    pub fn with_budget(
        articles: Arc<dyn ArticleStore>,
        provider: Arc<dyn EmbeddingProvider>,
        budget: Duration,
    ) -> Self {
        Self {
            articles,
            provider,
            budget,
        }
    }

    async fn refresh(&self, article_id: DbId) -> Result<(), SideEffectError> {
        let Some(article) = self.articles.load(article_id).await? else {
            tracing::warn!(article_id, "Article vanished before embedding generation");
            return Ok(());
        };

        // Title and summary carry most of the signal; the body is clipped
        // so huge articles do not blow the provider's input limit.
        let body_prefix: String = article.raw_body.chars().take(BODY_PREFIX_CHARS).collect();
        let text = format!(
            "{}\n{}\n{}",
            article.title,
            article.summary.as_deref().unwrap_or(""),
            body_prefix
        );

        let vector = tokio::time::timeout(self.budget, self.provider.generate(&text))
            .await
            .map_err(|_| SideEffectError::Timeout(self.budget))??;

        self.articles.store_embedding(article_id, vector).await?;
        tracing::info!(article_id, "Stored article embedding");
        Ok(())
    }
}

#[async_trait]
impl SideEffectHandler for EmbeddingTrigger {
    fn name(&self) -> &'static str {
        "embedding-trigger"
    }

    async fn handle(&self, event: &DomainEvent) -> Result<(), SideEffectError> {
        match event {
            DomainEvent::ArticlePublished { article_id, .. }
            | DomainEvent::ArticleEdited { article_id } => self.refresh(*article_id).await,
            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
