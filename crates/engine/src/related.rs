//! Related-article lookup with a three-tier degradation chain.
//!
//! Tier 1 ranks by vector similarity, tier 2 falls back to the article's
//! category by recency, tier 3 to the most recent public articles. Each
//! tier is individually caught: an error or an empty result falls through
//! to the next tier, and total failure yields an empty list. The resolver
//! never returns an error to the caller.

use std::sync::Arc;

use quill_core::content::Article;
use quill_core::types::DbId;
use quill_store::content::ArticleStore;

/// Resolves related articles for a given article.
pub struct RecommendationResolver {
    articles: Arc<dyn ArticleStore>,
}

impl RecommendationResolver {
    pub fn new(articles: Arc<dyn ArticleStore>) -> Self {
        Self { articles }
    }

    /// Find up to `limit` articles related to `article_id`, best tier
    /// first. Infallible by design; worst case is an empty list.
    pub async fn find_related(&self, article_id: DbId, limit: usize) -> Vec<Article> {
        let article = match self.articles.load(article_id).await {
            Ok(Some(article)) => article,
            Ok(None) => {
                tracing::warn!(article_id, "Article not found, no recommendations");
                return Vec::new();
            }
            Err(error) => {
                tracing::error!(article_id, error = %error, "Failed to load article for recommendations");
                return Vec::new();
            }
        };

        // Tier 1: vector similarity.
        if let Some(embedding) = article.embedding.as_deref().filter(|e| !e.is_empty()) {
            match self
                .articles
                .nearest_by_embedding(embedding, article_id, limit)
                .await
            {
                Ok(related) if !related.is_empty() => {
                    tracing::debug!(article_id, found = related.len(), "Vector-similarity tier hit");
                    return related;
                }
                Ok(_) => {
                    tracing::debug!(article_id, "Vector tier empty, degrading to category");
                }
                Err(error) => {
                    tracing::warn!(
                        article_id,
                        error = %error,
                        "Vector tier failed, degrading to category"
                    );
                }
            }
        } else {
            tracing::debug!(article_id, "No embedding, degrading to category");
        }

        // Tier 2: same category by recency.
        if let Some(category_id) = article.category_id {
            match self
                .articles
                .list_by_category(category_id, article_id, limit)
                .await
            {
                Ok(related) if !related.is_empty() => return related,
                Ok(_) => {
                    tracing::debug!(article_id, "Category tier empty, degrading to recency");
                }
                Err(error) => {
                    tracing::warn!(
                        article_id,
                        error = %error,
                        "Category tier failed, degrading to recency"
                    );
                }
            }
        }

        // Tier 3: most recent public articles.
        match self.articles.list_recent_published(article_id, limit).await {
            Ok(related) => related,
            Err(error) => {
                tracing::error!(
                    article_id,
                    error = %error,
                    "Every recommendation tier failed"
                );
                Vec::new()
            }
        }
    }
}
