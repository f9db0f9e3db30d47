//! End-to-end lifecycle tests against the in-memory stores.

use std::sync::Arc;

use assert_matches::assert_matches;
use tokio::sync::broadcast::error::TryRecvError;

use quill_core::error::CoreError;
use quill_core::status::{ArticleStatus, CommentStatus};
use quill_engine::{
    ArticleLifecycle, CommentLifecycle, EngineError, NewArticle, NewComment,
};
use quill_events::{DomainEvent, EventBus};
use quill_store::content::{ArticleStore, CommentStore};
use quill_store::memory::{MemoryArticleStore, MemoryCommentStore, MemoryUserDirectory};

fn article_input(title: &str, body: &str) -> NewArticle {
    NewArticle {
        author_id: 1,
        title: title.to_string(),
        raw_body: body.to_string(),
        category_id: None,
        summary: None,
    }
}

struct World {
    articles: Arc<MemoryArticleStore>,
    comments: Arc<MemoryCommentStore>,
    bus: Arc<EventBus>,
    article_lifecycle: ArticleLifecycle,
    comment_lifecycle: CommentLifecycle,
}

fn world() -> World {
    let articles = Arc::new(MemoryArticleStore::new());
    let comments = Arc::new(MemoryCommentStore::new());
    let users = Arc::new(MemoryUserDirectory::with_users(&[
        ("alice", 101),
        ("bob", 102),
    ]));
    let bus = Arc::new(EventBus::default());

    World {
        article_lifecycle: ArticleLifecycle::new(articles.clone(), bus.clone()),
        comment_lifecycle: CommentLifecycle::new(
            comments.clone(),
            articles.clone(),
            users,
            bus.clone(),
        ),
        articles,
        comments,
        bus,
    }
}

// ---------------------------------------------------------------------------
// Article creation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_derives_rendered_body_summary_and_outline() {
    let w = world();
    let article = w
        .article_lifecycle
        .create(article_input(
            "Intro",
            "# Welcome\n\nFirst paragraph of the article.",
        ))
        .await
        .unwrap();

    assert_eq!(article.status, ArticleStatus::Draft);
    assert!(article.rendered_body.as_deref().unwrap().contains("<h1>"));
    assert_eq!(
        article.summary.as_deref(),
        Some("Welcome First paragraph of the article.")
    );

    let outline: Vec<serde_json::Value> =
        serde_json::from_str(article.outline.as_deref().unwrap()).unwrap();
    assert_eq!(outline.len(), 1);
    assert_eq!(outline[0]["title"], "Welcome");
}

#[tokio::test]
async fn hand_written_summary_wins_over_extraction() {
    let w = world();
    let mut input = article_input("T", "Some body text.");
    input.summary = Some("My own summary".to_string());

    let article = w.article_lifecycle.create(input).await.unwrap();
    assert_eq!(article.summary.as_deref(), Some("My own summary"));
}

#[tokio::test]
async fn script_markup_never_survives_creation() {
    let w = world();
    let article = w
        .article_lifecycle
        .create(article_input("T", "hi <script>alert(1)</script> there"))
        .await
        .unwrap();

    let html = article.rendered_body.unwrap().to_lowercase();
    assert!(!html.contains("<script"));
}

// ---------------------------------------------------------------------------
// Article transitions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn publish_sets_timestamp_and_emits_one_event() {
    let w = world();
    let article = w
        .article_lifecycle
        .create(article_input("T", "body"))
        .await
        .unwrap();

    let mut rx = w.bus.subscribe();
    let published = w.article_lifecycle.publish(article.id).await.unwrap();

    assert_eq!(published.status, ArticleStatus::Published);
    assert!(published.published_at.is_some());
    assert_eq!(
        rx.try_recv().unwrap().event,
        DomainEvent::ArticlePublished {
            article_id: article.id,
            author_id: 1
        }
    );

    // Idempotent re-publish: no status change, no second event.
    let again = w.article_lifecycle.publish(article.id).await.unwrap();
    assert_eq!(again.published_at, published.published_at);
    assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn draft_cannot_be_archived() {
    let w = world();
    let article = w
        .article_lifecycle
        .create(article_input("T", "body"))
        .await
        .unwrap();

    let err = w.article_lifecycle.archive(article.id).await.unwrap_err();
    assert_matches!(
        err,
        EngineError::Core(CoreError::StateConflict {
            state: "Draft",
            operation: "archive"
        })
    );
}

#[tokio::test]
async fn archive_twice_is_a_noop() {
    let w = world();
    let article = w
        .article_lifecycle
        .create(article_input("T", "body"))
        .await
        .unwrap();
    w.article_lifecycle.publish(article.id).await.unwrap();

    let first = w.article_lifecycle.archive(article.id).await.unwrap();
    assert_eq!(first.status, ArticleStatus::Archived);

    let second = w.article_lifecycle.archive(article.id).await.unwrap();
    assert_eq!(second.status, ArticleStatus::Archived);
    assert_eq!(second.version, first.version);
}

#[tokio::test]
async fn unarchive_restores_visibility() {
    let w = world();
    let article = w
        .article_lifecycle
        .create(article_input("T", "body"))
        .await
        .unwrap();
    w.article_lifecycle.publish(article.id).await.unwrap();
    w.article_lifecycle.archive(article.id).await.unwrap();

    let restored = w.article_lifecycle.unarchive(article.id).await.unwrap();
    assert_eq!(restored.status, ArticleStatus::Published);
}

#[tokio::test]
async fn deleted_article_stays_loadable_but_cannot_transition() {
    let w = world();
    let article = w
        .article_lifecycle
        .create(article_input("T", "body"))
        .await
        .unwrap();

    w.article_lifecycle
        .delete(article.id, Some("cleanup".to_string()))
        .await
        .unwrap();

    let stored = w.articles.load(article.id).await.unwrap().unwrap();
    assert!(stored.deleted);
    assert_eq!(stored.audit_reason.as_deref(), Some("cleanup"));

    let err = w.article_lifecycle.publish(article.id).await.unwrap_err();
    assert_matches!(
        err,
        EngineError::Core(CoreError::StateConflict { state: "Deleted", .. })
    );

    // Deleting again is a quiet no-op.
    w.article_lifecycle.delete(article.id, None).await.unwrap();
}

#[tokio::test]
async fn unknown_article_is_not_found() {
    let w = world();
    let err = w.article_lifecycle.publish(404).await.unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::NotFound { .. }));
}

// ---------------------------------------------------------------------------
// Comment creation and threading
// ---------------------------------------------------------------------------

async fn published_article(w: &World) -> i64 {
    let article = w
        .article_lifecycle
        .create(article_input("Host", "body"))
        .await
        .unwrap();
    w.article_lifecycle.publish(article.id).await.unwrap();
    article.id
}

#[tokio::test]
async fn root_comment_is_its_own_thread_root() {
    let w = world();
    let article_id = published_article(&w).await;

    let comment = w
        .comment_lifecycle
        .create(NewComment {
            article_id,
            author_id: 5,
            raw_body: "first!".to_string(),
            parent_id: None,
        })
        .await
        .unwrap();

    assert_eq!(comment.status, CommentStatus::Pending);
    assert_eq!(comment.depth, 0);
    assert_eq!(comment.root_id, comment.id);
    assert_eq!(comment.path, format!("/{}", comment.id));
}

#[tokio::test]
async fn reply_extends_parent_path_and_depth() {
    let w = world();
    let article_id = published_article(&w).await;

    let root = w
        .comment_lifecycle
        .create(NewComment {
            article_id,
            author_id: 5,
            raw_body: "root".to_string(),
            parent_id: None,
        })
        .await
        .unwrap();

    let mut rx = w.bus.subscribe();
    let reply = w
        .comment_lifecycle
        .create(NewComment {
            article_id,
            author_id: 6,
            raw_body: "reply".to_string(),
            parent_id: Some(root.id),
        })
        .await
        .unwrap();

    assert_eq!(reply.depth, root.depth + 1);
    assert_eq!(reply.path, format!("{}/{}", root.path, reply.id));
    assert_eq!(reply.root_id, root.id);

    let parent = w.comments.load(root.id).await.unwrap().unwrap();
    assert_eq!(parent.reply_count, 1);

    assert_eq!(
        rx.try_recv().unwrap().event,
        DomainEvent::CommentReplied {
            comment_id: reply.id,
            parent_comment_id: root.id,
            replied_user_id: 5,
            replier_id: 6,
        }
    );
}

#[tokio::test]
async fn missing_parent_demotes_reply_to_root() {
    let w = world();
    let article_id = published_article(&w).await;

    let comment = w
        .comment_lifecycle
        .create(NewComment {
            article_id,
            author_id: 5,
            raw_body: "orphan".to_string(),
            parent_id: Some(9999),
        })
        .await
        .unwrap();

    assert_eq!(comment.depth, 0);
    assert_eq!(comment.parent_id, None);
    assert_eq!(comment.root_id, comment.id);
}

#[tokio::test]
async fn reply_nesting_is_capped() {
    let w = world();
    let article_id = published_article(&w).await;

    let mut parent_id = None;
    for _ in 0..=quill_core::thread::MAX_DEPTH {
        let comment = w
            .comment_lifecycle
            .create(NewComment {
                article_id,
                author_id: 5,
                raw_body: "deeper".to_string(),
                parent_id,
            })
            .await
            .unwrap();
        parent_id = Some(comment.id);
    }

    let err = w
        .comment_lifecycle
        .create(NewComment {
            article_id,
            author_id: 5,
            raw_body: "too deep".to_string(),
            parent_id,
        })
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Validation(_)));
}

#[tokio::test]
async fn masked_terms_are_replaced_before_rendering() {
    let w = world();
    let article_id = published_article(&w).await;

    let comment = w
        .comment_lifecycle
        .create(NewComment {
            article_id,
            author_id: 5,
            raw_body: "check out this casino link".to_string(),
            parent_id: None,
        })
        .await
        .unwrap();

    let html = comment.rendered_body.unwrap();
    assert!(!html.contains("casino"));
    assert!(html.contains("***"));
}

#[tokio::test]
async fn mentions_emit_resolved_user_ids_only() {
    let w = world();
    let article_id = published_article(&w).await;

    let mut rx = w.bus.subscribe();
    let comment = w
        .comment_lifecycle
        .create(NewComment {
            article_id,
            author_id: 5,
            raw_body: "ping @alice and @ghost".to_string(),
            parent_id: None,
        })
        .await
        .unwrap();

    assert_eq!(
        rx.try_recv().unwrap().event,
        DomainEvent::UserMentioned {
            comment_id: comment.id,
            mentioned_user_ids: vec![101],
            mentioner_id: 5,
        }
    );
}

#[tokio::test]
async fn comment_on_unknown_article_fails() {
    let w = world();
    let err = w
        .comment_lifecycle
        .create(NewComment {
            article_id: 404,
            author_id: 5,
            raw_body: "where am I".to_string(),
            parent_id: None,
        })
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::NotFound { .. }));
}

// ---------------------------------------------------------------------------
// Comment moderation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reject_then_approve_is_a_state_conflict() {
    let w = world();
    let article_id = published_article(&w).await;
    let comment = w
        .comment_lifecycle
        .create(NewComment {
            article_id,
            author_id: 5,
            raw_body: "hmm".to_string(),
            parent_id: None,
        })
        .await
        .unwrap();

    let rejected = w
        .comment_lifecycle
        .reject(comment.id, "spam")
        .await
        .unwrap();
    assert_eq!(rejected.status, CommentStatus::Rejected);
    assert_eq!(rejected.audit_reason.as_deref(), Some("spam"));

    let err = w.comment_lifecycle.approve(comment.id).await.unwrap_err();
    assert_matches!(
        err,
        EngineError::Core(CoreError::StateConflict {
            state: "Rejected",
            operation: "approve"
        })
    );
}

#[tokio::test]
async fn approve_emits_event_once() {
    let w = world();
    let article_id = published_article(&w).await;
    let comment = w
        .comment_lifecycle
        .create(NewComment {
            article_id,
            author_id: 5,
            raw_body: "fine".to_string(),
            parent_id: None,
        })
        .await
        .unwrap();

    let mut rx = w.bus.subscribe();
    w.comment_lifecycle.approve(comment.id).await.unwrap();
    assert_eq!(
        rx.try_recv().unwrap().event,
        DomainEvent::CommentApproved {
            comment_id: comment.id,
            author_id: 5,
        }
    );

    // Second approval no-ops without another event.
    w.comment_lifecycle.approve(comment.id).await.unwrap();
    assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn admin_delete_records_reason_and_is_terminal() {
    let w = world();
    let article_id = published_article(&w).await;
    let comment = w
        .comment_lifecycle
        .create(NewComment {
            article_id,
            author_id: 5,
            raw_body: "gone soon".to_string(),
            parent_id: None,
        })
        .await
        .unwrap();

    let deleted = w
        .comment_lifecycle
        .delete_by_admin(comment.id, "abuse")
        .await
        .unwrap();
    assert_eq!(deleted.status, CommentStatus::AdminDeleted);
    assert_eq!(deleted.audit_reason.as_deref(), Some("abuse"));

    let err = w
        .comment_lifecycle
        .delete_by_user(comment.id)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        EngineError::Core(CoreError::StateConflict { state: "Deleted", .. })
    );
}
