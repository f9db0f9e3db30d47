//! Comment lifecycle orchestration.
//!
//! Creation runs the comment pipeline, places the comment in its thread,
//! persists, then emits reply and mention events. Moderation operations
//! follow the same load → resolve → transition → persist → emit shape as
//! articles.

use std::sync::Arc;

use quill_core::content::Comment;
use quill_core::error::CoreError;
use quill_core::mention::MentionParser;
use quill_core::pipeline::Pipeline;
use quill_core::state::CommentState;
use quill_core::thread::{path_for, ThreadPosition};
use quill_core::types::DbId;
use quill_events::{DomainEvent, EventBus};
use quill_store::content::{ArticleStore, CommentStore};
use quill_store::users::UserDirectory;

use crate::error::EngineResult;

/// Input for creating a comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub article_id: DbId,
    pub author_id: DbId,
    pub raw_body: String,
    /// Comment being replied to; `None` for a root comment.
    pub parent_id: Option<DbId>,
}

/// Orchestrates comment creation, moderation, and like counting.
pub struct CommentLifecycle {
    comments: Arc<dyn CommentStore>,
    articles: Arc<dyn ArticleStore>,
    users: Arc<dyn UserDirectory>,
    bus: Arc<EventBus>,
    pipeline: Pipeline,
    mentions: MentionParser,
}

impl CommentLifecycle {
    pub fn new(
        comments: Arc<dyn CommentStore>,
        articles: Arc<dyn ArticleStore>,
        users: Arc<dyn UserDirectory>,
        bus: Arc<EventBus>,
    ) -> Self {
        Self {
            comments,
            articles,
            users,
            bus,
            pipeline: Pipeline::comments(),
            mentions: MentionParser::new(),
        }
    }

    /// Create a pending comment under an article, optionally replying to
    /// an existing comment.
    ///
    /// A `parent_id` that no longer resolves demotes the comment to a
    /// root instead of failing; the parent may have been deleted between
    /// the reader loading the page and submitting.
    pub async fn create(&self, input: NewComment) -> EngineResult<Comment> {
        if self.articles.load(input.article_id).await?.is_none() {
            return Err(CoreError::NotFound {
                entity: "article",
                id: input.article_id,
            }
            .into());
        }

        let processed = self.pipeline.process(&input.raw_body)?;

        let parent = match input.parent_id {
            Some(parent_id) => {
                let parent = self.comments.load(parent_id).await?;
                if parent.is_none() {
                    tracing::warn!(
                        parent_id,
                        "Parent comment missing, demoting reply to a root comment"
                    );
                }
                parent
            }
            None => None,
        };

        let position = match &parent {
            Some(parent) => ThreadPosition::under(parent)?,
            None => ThreadPosition::root(),
        };

        let mut comment = Comment::new(input.article_id, input.author_id, input.raw_body);
        comment.rendered_body = Some(processed.rendered_body);
        comment.parent_id = position.parent_id;
        comment.depth = position.depth;
        comment.root_id = position.root_id.unwrap_or(0);

        self.comments.insert(&mut comment).await?;

        // The path needs the assigned id; fix it up in a second write,
        // and point a root comment's root_id at itself.
        comment.path = path_for(parent.as_ref().map(|p| p.path.as_str()), comment.id);
        if comment.root_id == 0 {
            comment.root_id = comment.id;
        }
        self.comments.update(&mut comment).await?;

        tracing::info!(
            comment_id = comment.id,
            article_id = comment.article_id,
            depth = comment.depth,
            "Created comment"
        );

        if let Some(mut parent) = parent {
            parent.reply_count += 1;
            self.comments.update(&mut parent).await?;

            self.bus.publish(DomainEvent::CommentReplied {
                comment_id: comment.id,
                parent_comment_id: parent.id,
                replied_user_id: parent.author_id,
                replier_id: input.author_id,
            });
        }

        self.emit_mentions(&comment).await?;
        Ok(comment)
    }

    /// Pass moderation; the comment becomes visible and its author is
    /// notified asynchronously.
    pub async fn approve(&self, comment_id: DbId) -> EngineResult<Comment> {
        let mut comment = self.load(comment_id).await?;
        let state = CommentState::resolve(comment.status);
        let transition = state.approve(&mut comment)?;

        if transition.changed() {
            self.comments.update(&mut comment).await?;
            self.bus.publish(DomainEvent::CommentApproved {
                comment_id,
                author_id: comment.author_id,
            });
        }
        Ok(comment)
    }

    /// Fail moderation, recording the reason.
    pub async fn reject(&self, comment_id: DbId, reason: &str) -> EngineResult<Comment> {
        let mut comment = self.load(comment_id).await?;
        let state = CommentState::resolve(comment.status);
        if state.reject(&mut comment, reason)?.changed() {
            self.comments.update(&mut comment).await?;
        }
        Ok(comment)
    }

    /// The author removes their own comment.
    pub async fn delete_by_user(&self, comment_id: DbId) -> EngineResult<Comment> {
        let mut comment = self.load(comment_id).await?;
        let state = CommentState::resolve(comment.status);
        if state.delete_by_user(&mut comment)?.changed() {
            self.comments.update(&mut comment).await?;
        }
        Ok(comment)
    }

    /// A moderator removes the comment, recording the reason.
    pub async fn delete_by_admin(&self, comment_id: DbId, reason: &str) -> EngineResult<Comment> {
        let mut comment = self.load(comment_id).await?;
        let state = CommentState::resolve(comment.status);
        if state.delete_by_admin(&mut comment, reason)?.changed() {
            self.comments.update(&mut comment).await?;
        }
        Ok(comment)
    }

    /// Record a like. The counter itself is adjusted asynchronously.
    pub async fn like(&self, comment_id: DbId, user_id: DbId) -> EngineResult<()> {
        self.load(comment_id).await?;
        self.bus
            .publish(DomainEvent::CommentLiked { comment_id, user_id });
        Ok(())
    }

    /// Withdraw a like.
    pub async fn unlike(&self, comment_id: DbId, user_id: DbId) -> EngineResult<()> {
        self.load(comment_id).await?;
        self.bus
            .publish(DomainEvent::CommentUnliked { comment_id, user_id });
        Ok(())
    }

    /// Resolve @-mentions in the comment body and emit one event for all
    /// of them. Unresolvable usernames notify nobody.
    async fn emit_mentions(&self, comment: &Comment) -> EngineResult<()> {
        let usernames = self.mentions.extract(&comment.raw_body);
        if usernames.is_empty() {
            return Ok(());
        }

        let user_ids = self.users.ids_for_usernames(&usernames).await?;
        if user_ids.is_empty() {
            return Ok(());
        }

        self.bus.publish(DomainEvent::UserMentioned {
            comment_id: comment.id,
            mentioned_user_ids: user_ids,
            mentioner_id: comment.author_id,
        });
        Ok(())
    }

    async fn load(&self, comment_id: DbId) -> EngineResult<Comment> {
        self.comments
            .load(comment_id)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "comment",
                    id: comment_id,
                }
                .into()
            })
    }
}
