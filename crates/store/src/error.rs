use quill_core::types::DbId;

/// Error type for the persistence collaborators.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// The write carried a stale version; a concurrent transition won.
    /// The caller must reload and retry or reject, never overwrite.
    #[error("Version conflict on {entity} with id {id}: expected {expected}, found {found}")]
    VersionConflict {
        entity: &'static str,
        id: DbId,
        expected: i64,
        found: i64,
    },

    /// The backing store failed in a way the core cannot interpret.
    #[error("Store backend error: {0}")]
    Backend(String),
}
