//! Thread-position math for comments.
//!
//! `depth`, `path` and `root_id` are denormalized from `parent_id` so
//! subtree queries stay cheap. The helpers here compute a child's position
//! from its parent; the lifecycle service applies them around persistence
//! (the `path` needs the comment's own id, which the store assigns on
//! first save).

use crate::content::Comment;
use crate::error::CoreError;
use crate::types::DbId;

/// Maximum nesting depth for replies. A reply to a comment at this depth
/// is rejected rather than silently flattened.
pub const MAX_DEPTH: i32 = 5;

/// Thread placement computed before the comment has an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadPosition {
    pub parent_id: Option<DbId>,
    pub depth: i32,
    /// The thread root. `None` for a root comment, whose `root_id`
    /// becomes its own id once assigned.
    pub root_id: Option<DbId>,
}

impl ThreadPosition {
    /// Placement for a root comment.
    pub fn root() -> Self {
        Self {
            parent_id: None,
            depth: 0,
            root_id: None,
        }
    }

    /// Placement for a reply under `parent`.
    ///
    /// Fails validation when the parent already sits at [`MAX_DEPTH`].
    pub fn under(parent: &Comment) -> Result<Self, CoreError> {
        if parent.depth >= MAX_DEPTH {
            return Err(CoreError::Validation(format!(
                "Reply nesting exceeds the maximum depth of {MAX_DEPTH} (parent depth {})",
                parent.depth
            )));
        }
        Ok(Self {
            parent_id: Some(parent.id),
            depth: parent.depth + 1,
            root_id: Some(if parent.root_id != 0 {
                parent.root_id
            } else {
                parent.id
            }),
        })
    }
}

/// Materialized path for a comment once its id is known.
///
/// A root comment's path is `"/" + id`; a reply appends its id to the
/// parent's path.
pub fn path_for(parent_path: Option<&str>, id: DbId) -> String {
    match parent_path {
        Some(parent) => format!("{parent}/{id}"),
        None => format!("/{id}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
