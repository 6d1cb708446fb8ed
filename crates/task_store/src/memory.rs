//! In-memory task store implementation.

use async_trait::async_trait;
use entities::{Task, TaskStatus};
use tokio::sync::RwLock;

use crate::{TaskStore, TaskStoreResult};

/// In-memory task store.
///
/// Tasks live in an insertion-ordered list; nothing is persisted. The lock
/// only keeps the list sound under a multi-threaded server — there is no
/// cross-operation atomicity, so this store is meant for development and
/// tests, not for production multi-writer use.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<Vec<Task>>,
}

impl MemoryTaskStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list(&self) -> TaskStoreResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.clone())
    }

    async fn create(
        &self,
        name: &str,
        status: &str,
        description: Option<&str>,
    ) -> TaskStoreResult<bool> {
        let Some(status) = TaskStatus::from_label(status) else {
            return Ok(false);
        };
        if name.is_empty() {
            return Ok(false);
        }

        let mut tasks = self.tasks.write().await;
        let id = tasks.len() as i64 + 1;
        tasks.push(Task {
            id,
            name: name.to_string(),
            status,
            description: description.map(str::to_string),
        });
        Ok(true)
    }

    async fn remove(&self, id: i64) -> TaskStoreResult<bool> {
        let mut tasks = self.tasks.write().await;
        tasks.retain(|task| task.id != id);
        // Reports success whether or not the id existed.
        Ok(true)
    }

    async fn update(
        &self,
        id: i64,
        name: &str,
        status: &str,
        description: Option<&str>,
    ) -> TaskStoreResult<bool> {
        let Some(status) = TaskStatus::from_label(status) else {
            return Ok(false);
        };
        if name.is_empty() {
            return Ok(false);
        }

        let mut tasks = self.tasks.write().await;
        let Some(task) = tasks.iter_mut().find(|task| task.id == id) else {
            return Ok(false);
        };
        task.name = name.to_string();
        task.status = status;
        task.description = description.map(str::to_string);
        Ok(true)
    }
}
