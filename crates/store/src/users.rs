//! Username resolution for @-mentions.

use async_trait::async_trait;
use quill_core::types::DbId;

use crate::error::StoreError;

/// Resolves usernames to user ids.
///
/// Unknown usernames are silently dropped from the result; a mention of a
/// non-existent user is not an error, it just notifies nobody.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn ids_for_usernames(&self, usernames: &[String]) -> Result<Vec<DbId>, StoreError>;
}
