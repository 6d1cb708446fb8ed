//! Task store trait definition.

use async_trait::async_trait;
use entities::Task;

use crate::TaskStoreResult;

/// Trait for task storage operations.
///
/// The boolean-returning operations report validation failures (empty name,
/// unrecognized status label, unknown id on update) as `Ok(false)` without
/// mutating anything; `Err` is reserved for storage failures.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Returns all tasks, in insertion order for the in-memory store and
    /// primary-key order for the database store.
    async fn list(&self) -> TaskStoreResult<Vec<Task>>;

    /// Validates the fields and stores a new task under a fresh id.
    async fn create(
        &self,
        name: &str,
        status: &str,
        description: Option<&str>,
    ) -> TaskStoreResult<bool>;

    /// Removes the task with the given id.
    ///
    /// The two implementations intentionally diverge here: the database
    /// store returns `false` when the id is absent, while the in-memory
    /// store always returns `true`.
    async fn remove(&self, id: i64) -> TaskStoreResult<bool>;

    /// Overwrites the name, status and description of an existing task.
    async fn update(
        &self,
        id: i64,
        name: &str,
        status: &str,
        description: Option<&str>,
    ) -> TaskStoreResult<bool>;
}
