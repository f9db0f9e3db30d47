use quill_core::error::CoreError;
use quill_store::error::StoreError;

/// Error type for lifecycle operations.
///
/// State conflicts and pipeline failures arrive as [`CoreError`]; stale
/// writes and backend faults as [`StoreError`]. Both are synchronous and
/// caller-visible — everything downstream of a successful transition is
/// asynchronous and never surfaces here.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience alias for lifecycle results.
pub type EngineResult<T> = Result<T, EngineError>;
