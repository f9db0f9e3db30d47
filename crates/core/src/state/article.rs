//! Article lifecycle state machine.
//!
//! Legal transitions:
//!
//! ```text
//! Draft ──publish──► Published ──archive──► Archived
//!                        ▲                     │
//!                        └──────unarchive──────┘
//! ```
//!
//! `Draft → Archived` is forbidden, as is any transition back to `Draft`.
//! Re-invoking a transition whose target state is already reached logs and
//! no-ops.

use crate::content::Article;
use crate::error::CoreError;
use crate::state::Transition;
use crate::status::ArticleStatus;

/// Per-stage view of an article used to decide transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleState {
    Draft,
    Published,
    Archived,
}

impl ArticleState {
    /// Resolve the state for an article's persisted status.
    pub fn resolve(status: ArticleStatus) -> Self {
        match status {
            ArticleStatus::Draft => Self::Draft,
            ArticleStatus::Published => Self::Published,
            ArticleStatus::Archived => Self::Archived,
        }
    }

    /// State name used in conflict errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Published => "Published",
            Self::Archived => "Archived",
        }
    }

    /// Publish the article.
    ///
    /// Sets `published_at` on the first publication only; re-publishing an
    /// already published article is a no-op. An archived article must be
    /// unarchived first.
    pub fn publish(self, article: &mut Article) -> Result<Transition, CoreError> {
        match self {
            Self::Draft => {
                tracing::info!(article_id = article.id, "Draft -> Published");
                let now = chrono::Utc::now();
                article.status = ArticleStatus::Published;
                if article.published_at.is_none() {
                    article.published_at = Some(now);
                }
                article.updated_at = now;
                Ok(Transition::Applied)
            }
            Self::Published => {
                tracing::warn!(article_id = article.id, "Article is already published");
                Ok(Transition::Noop)
            }
            Self::Archived => Err(CoreError::StateConflict {
                state: self.name(),
                operation: "publish",
            }),
        }
    }

    /// Archive the article, removing it from listings.
    pub fn archive(self, article: &mut Article) -> Result<Transition, CoreError> {
        match self {
            Self::Published => {
                tracing::info!(article_id = article.id, "Published -> Archived");
                article.status = ArticleStatus::Archived;
                article.updated_at = chrono::Utc::now();
                Ok(Transition::Applied)
            }
            Self::Archived => {
                tracing::warn!(article_id = article.id, "Article is already archived");
                Ok(Transition::Noop)
            }
            Self::Draft => Err(CoreError::StateConflict {
                state: self.name(),
                operation: "archive",
            }),
        }
    }

    /// Restore an archived article to the published stage.
    pub fn unarchive(self, article: &mut Article) -> Result<Transition, CoreError> {
        match self {
            Self::Archived => {
                tracing::info!(article_id = article.id, "Archived -> Published");
                article.status = ArticleStatus::Published;
                article.updated_at = chrono::Utc::now();
                Ok(Transition::Applied)
            }
            Self::Published => {
                tracing::warn!(article_id = article.id, "Article is already published");
                Ok(Transition::Noop)
            }
            Self::Draft => Err(CoreError::StateConflict {
                state: self.name(),
                operation: "unarchive",
            }),
        }
    }

    /// Whether soft-deleting from this state is allowed.
    ///
    /// Every stage permits deletion; deleting a published article is legal
    /// but logged at warn level because readers lose a live page.
    pub fn can_delete(&self, article: &Article) -> bool {
        if matches!(self, Self::Published) {
            tracing::warn!(article_id = article.id, "Deleting a published article");
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn draft() -> Article {
        Article::new(1, "t", "b")
    }

    fn published() -> Article {
        let mut article = draft();
        ArticleState::Draft.publish(&mut article).unwrap();
        article
    }

    #[test]
    fn draft_publish_sets_status_and_timestamp() {
        let mut article = draft();
        let outcome = ArticleState::Draft.publish(&mut article).unwrap();
        assert_eq!(outcome, Transition::Applied);
        assert_eq!(article.status, ArticleStatus::Published);
        assert!(article.published_at.is_some());
    }

    #[test]
    fn republish_is_noop_and_keeps_published_at() {
        let mut article = published();
        let first_published_at = article.published_at;

        let state = ArticleState::resolve(article.status);
        let outcome = state.publish(&mut article).unwrap();

        assert_eq!(outcome, Transition::Noop);
        assert_eq!(article.published_at, first_published_at);
        assert_eq!(article.status, ArticleStatus::Published);
    }

    #[test]
    fn draft_cannot_archive() {
        let mut article = draft();
        let err = ArticleState::Draft.archive(&mut article).unwrap_err();
        assert_matches!(
            err,
            CoreError::StateConflict {
                state: "Draft",
                operation: "archive"
            }
        );
        assert_eq!(article.status, ArticleStatus::Draft);
    }

    #[test]
    fn archive_then_archive_again_is_noop() {
        let mut article = published();
        assert_eq!(
            ArticleState::Published.archive(&mut article).unwrap(),
            Transition::Applied
        );
        assert_eq!(
            ArticleState::Archived.archive(&mut article).unwrap(),
            Transition::Noop
        );
        assert_eq!(article.status, ArticleStatus::Archived);
    }

    #[test]
    fn archived_cannot_publish_directly() {
        let mut article = published();
        ArticleState::Published.archive(&mut article).unwrap();
        let err = ArticleState::Archived.publish(&mut article).unwrap_err();
        assert_matches!(err, CoreError::StateConflict { operation: "publish", .. });
    }

    #[test]
    fn unarchive_restores_published() {
        let mut article = published();
        let first_published_at = article.published_at;
        ArticleState::Published.archive(&mut article).unwrap();

        let outcome = ArticleState::Archived.unarchive(&mut article).unwrap();

        assert_eq!(outcome, Transition::Applied);
        assert_eq!(article.status, ArticleStatus::Published);
        // Unarchiving does not count as a new publication.
        assert_eq!(article.published_at, first_published_at);
    }

    #[test]
    fn draft_cannot_unarchive() {
        let mut article = draft();
        let err = ArticleState::Draft.unarchive(&mut article).unwrap_err();
        assert_matches!(err, CoreError::StateConflict { state: "Draft", .. });
    }

    #[test]
    fn every_state_permits_delete() {
        let article = published();
        assert!(ArticleState::Draft.can_delete(&article));
        assert!(ArticleState::Published.can_delete(&article));
        assert!(ArticleState::Archived.can_delete(&article));
    }
}
