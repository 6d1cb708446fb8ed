//! Task store error types.

use thiserror::Error;

/// Errors that can occur during task store operations.
///
/// Validation outcomes (empty name, unknown status label, missing id) are
/// not errors; the store operations report those as `false`.
#[derive(Debug, Error)]
pub enum TaskStoreError {
    /// Storage unreachable after the retry budget was exhausted.
    #[error("storage unavailable after {attempts} attempts")]
    Unavailable {
        attempts: u32,
        #[source]
        source: sqlx::Error,
    },

    /// Database error that is not worth retrying.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;
