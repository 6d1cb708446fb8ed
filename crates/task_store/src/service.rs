//! Store-facing service facade consumed by the HTTP layer.

use std::sync::Arc;

use entities::Task;

use crate::{TaskStore, TaskStoreResult};

/// Thin facade over the store implementation chosen at startup.
///
/// The routing layer only ever talks to this type; which store sits behind
/// it is fixed for the lifetime of the process.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    /// Wraps the given store.
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Returns all tasks.
    pub async fn list(&self) -> TaskStoreResult<Vec<Task>> {
        self.store.list().await
    }

    /// Creates a task.
    pub async fn create(
        &self,
        name: &str,
        status: &str,
        description: Option<&str>,
    ) -> TaskStoreResult<bool> {
        self.store.create(name, status, description).await
    }

    /// Removes a task by id.
    pub async fn remove(&self, id: i64) -> TaskStoreResult<bool> {
        self.store.remove(id).await
    }

    /// Updates a task by id.
    pub async fn update(
        &self,
        id: i64,
        name: &str,
        status: &str,
        description: Option<&str>,
    ) -> TaskStoreResult<bool> {
        self.store.update(id, name, status, description).await
    }
}
