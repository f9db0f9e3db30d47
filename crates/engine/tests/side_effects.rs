//! Full-stack tests: lifecycle operations feeding the side-effect runner.
//!
//! Side effects are asynchronous and fire-and-forget, so assertions poll
//! the stores with a timeout instead of expecting immediate visibility.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use quill_engine::{ArticleLifecycle, CommentLifecycle, NewArticle, NewComment};
use quill_events::{
    CounterAdjuster, EmbeddingTrigger, EventBus, NotificationCreator, SideEffectRunner,
    StatsInitializer,
};
use quill_store::content::{ArticleStore, CommentStore};
use quill_store::memory::{
    MemoryArticleStore, MemoryCommentStore, MemoryNotificationStore, MemoryStatsStore,
    MemoryUserDirectory,
};
use quill_store::notification::NotificationStore;
use quill_store::stats::StatsStore;
use quill_store::MockEmbeddingProvider;

struct Stack {
    articles: Arc<MemoryArticleStore>,
    comments: Arc<MemoryCommentStore>,
    stats: Arc<MemoryStatsStore>,
    notifications: Arc<MemoryNotificationStore>,
    article_lifecycle: ArticleLifecycle,
    comment_lifecycle: CommentLifecycle,
    cancel: CancellationToken,
}

impl Drop for Stack {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Wire every handler to the bus the lifecycles publish on.
fn stack() -> Stack {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let articles = Arc::new(MemoryArticleStore::new());
    let comments = Arc::new(MemoryCommentStore::new());
    let stats = Arc::new(MemoryStatsStore::default());
    let notifications = Arc::new(MemoryNotificationStore::new());
    let users = Arc::new(MemoryUserDirectory::with_users(&[("alice", 101)]));
    let bus = Arc::new(EventBus::default());

    let runner = Arc::new(
        SideEffectRunner::default()
            .register(Arc::new(StatsInitializer::new(stats.clone())))
            .register(Arc::new(EmbeddingTrigger::new(
                articles.clone(),
                Arc::new(MockEmbeddingProvider),
            )))
            .register(Arc::new(NotificationCreator::new(notifications.clone())))
            .register(Arc::new(CounterAdjuster::new(comments.clone()))),
    );

    let cancel = CancellationToken::new();
    tokio::spawn(runner.run(bus.subscribe(), cancel.clone()));

    Stack {
        article_lifecycle: ArticleLifecycle::new(articles.clone(), bus.clone()),
        comment_lifecycle: CommentLifecycle::new(comments.clone(), articles.clone(), users, bus),
        articles,
        comments,
        stats,
        notifications,
        cancel,
    }
}

/// Poll until `check` passes or five seconds elapse.
async fn eventually<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if check().await {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("side effect did not materialize in time");
}

async fn publish_article(stack: &Stack) -> i64 {
    let article = stack
        .article_lifecycle
        .create(NewArticle {
            author_id: 1,
            title: "Hello".to_string(),
            raw_body: "# Hello\n\nWorld.".to_string(),
            category_id: None,
            summary: None,
        })
        .await
        .unwrap();
    stack.article_lifecycle.publish(article.id).await.unwrap();
    article.id
}

#[tokio::test]
async fn publishing_initializes_stats_and_embedding() {
    let stack = stack();
    let article_id = publish_article(&stack).await;

    let s = &stack;
    eventually(move || async move { s.stats.get(article_id).await.unwrap().is_some() }).await;
    eventually(move || async move {
        s.articles
            .load(article_id)
            .await
            .unwrap()
            .unwrap()
            .has_embedding()
    })
    .await;

    let row = stack.stats.get(article_id).await.unwrap().unwrap();
    assert_eq!(row.view_count, 0);
    assert_eq!(row.like_count, 0);
}

#[tokio::test]
async fn editing_a_published_article_refreshes_the_embedding() {
    let stack = stack();
    let article_id = publish_article(&stack).await;

    let s = &stack;
    eventually(move || async move {
        s.articles
            .load(article_id)
            .await
            .unwrap()
            .unwrap()
            .has_embedding()
    })
    .await;

    let before = stack
        .articles
        .load(article_id)
        .await
        .unwrap()
        .unwrap()
        .embedding
        .unwrap();

    stack
        .article_lifecycle
        .edit_body(article_id, "# Hello\n\nCompletely different body.")
        .await
        .unwrap();

    let before = &before;
    eventually(move || async move {
        let current = s
            .articles
            .load(article_id)
            .await
            .unwrap()
            .unwrap()
            .embedding
            .unwrap();
        current != *before
    })
    .await;
}

#[tokio::test]
async fn a_reply_notifies_the_parent_author() {
    let stack = stack();
    let article_id = publish_article(&stack).await;

    let root = stack
        .comment_lifecycle
        .create(NewComment {
            article_id,
            author_id: 5,
            raw_body: "root comment".to_string(),
            parent_id: None,
        })
        .await
        .unwrap();

    stack
        .comment_lifecycle
        .create(NewComment {
            article_id,
            author_id: 6,
            raw_body: "a reply".to_string(),
            parent_id: Some(root.id),
        })
        .await
        .unwrap();

    let s = &stack;
    eventually(move || async move {
        !s.notifications.list_for_user(5).await.unwrap().is_empty()
    })
    .await;
}

#[tokio::test]
async fn mentioning_a_user_notifies_them() {
    let stack = stack();
    let article_id = publish_article(&stack).await;

    stack
        .comment_lifecycle
        .create(NewComment {
            article_id,
            author_id: 5,
            raw_body: "great point @alice".to_string(),
            parent_id: None,
        })
        .await
        .unwrap();

    let s = &stack;
    eventually(move || async move {
        !s.notifications.list_for_user(101).await.unwrap().is_empty()
    })
    .await;
}

#[tokio::test]
async fn likes_and_unlikes_converge_on_the_counter() {
    let stack = stack();
    let article_id = publish_article(&stack).await;

    let comment = stack
        .comment_lifecycle
        .create(NewComment {
            article_id,
            author_id: 5,
            raw_body: "like me".to_string(),
            parent_id: None,
        })
        .await
        .unwrap();

    stack.comment_lifecycle.like(comment.id, 7).await.unwrap();
    stack.comment_lifecycle.like(comment.id, 8).await.unwrap();
    stack.comment_lifecycle.unlike(comment.id, 7).await.unwrap();

    let s = &stack;
    let comment_id = comment.id;
    eventually(move || async move {
        s.comments.load(comment_id).await.unwrap().unwrap().like_count == 1
    })
    .await;
}
