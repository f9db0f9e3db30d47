use crate::types::DbId;

/// Domain-level error type shared across the workspace.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A lifecycle transition was requested that the current state forbids.
    ///
    /// Carries both sides so callers can report exactly what was attempted
    /// from where.
    #[error("Cannot {operation} content in state {state}")]
    StateConflict {
        state: &'static str,
        operation: &'static str,
    },

    /// A content-pipeline stage failed before persistence.
    #[error("Content processing failed in stage {stage}: {reason}")]
    Pipeline { stage: &'static str, reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}
