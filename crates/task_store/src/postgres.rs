//! PostgreSQL task store implementation.

use std::time::Duration;

use async_trait::async_trait;
use entities::{Task, TaskStatus};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tokio::sync::RwLock;

use crate::retry::with_retry;
use crate::{TaskStore, TaskStoreResult};

/// Base connection pool size.
const POOL_SIZE: u32 = 10;
/// Extra connections allowed beyond the base size under load.
const POOL_MAX_OVERFLOW: u32 = 20;
/// Age at which pooled connections are recycled.
const POOL_RECYCLE: Duration = Duration::from_secs(300);

/// SQL schema definition, executed at startup.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    status INTEGER NOT NULL,
    description VARCHAR(1000)
)
"#;

/// A connection pool bound to one target, rebuildable after a transient
/// failure.
struct PoolHandle {
    url: String,
    pool: RwLock<PgPool>,
}

impl PoolHandle {
    fn options() -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(POOL_SIZE + POOL_MAX_OVERFLOW)
            .max_lifetime(POOL_RECYCLE)
            .test_before_acquire(true)
    }

    /// Builds a handle without opening connections; the pool connects on
    /// first use.
    fn connect_lazy(url: &str) -> Result<Self, sqlx::Error> {
        let pool = Self::options().connect_lazy(url)?;
        Ok(Self {
            url: url.to_string(),
            pool: RwLock::new(pool),
        })
    }

    async fn pool(&self) -> PgPool {
        self.pool.read().await.clone()
    }

    /// Closes every pooled connection and starts over with a fresh pool.
    async fn rebuild(&self) {
        let fresh = match Self::options().connect_lazy(&self.url) {
            Ok(pool) => pool,
            // connect_lazy only rejects unparseable URLs, which building
            // this handle already ruled out.
            Err(err) => {
                tracing::error!(error = %err, "failed to rebuild connection pool");
                return;
            }
        };
        let stale = {
            let mut pool = self.pool.write().await;
            std::mem::replace(&mut *pool, fresh)
        };
        stale.close().await;
        tracing::info!("connection pool recycled");
    }
}

/// PostgreSQL-backed task store.
///
/// Every operation runs under the retry policy in [`crate::retry`], with a
/// pool rebuild as the recovery step between attempts. When a distinct read
/// target is configured, `list` is served from it; all mutations go to the
/// write target.
pub struct PgTaskStore {
    writer: PoolHandle,
    /// `None` means reads share the writer pool.
    reader: Option<PoolHandle>,
}

impl PgTaskStore {
    /// Connects to the write target (and read target, when given and
    /// distinct) and creates the schema.
    pub async fn connect(write_url: &str, read_url: Option<&str>) -> TaskStoreResult<Self> {
        let writer = PoolHandle::connect_lazy(write_url)?;
        let reader = match read_url {
            Some(url) if url != write_url => Some(PoolHandle::connect_lazy(url)?),
            _ => None,
        };
        if reader.is_some() {
            tracing::info!("read queries routed to a dedicated read target");
        }

        let store = Self { writer, reader };
        store.ensure_schema().await?;
        Ok(store)
    }

    fn read_handle(&self) -> &PoolHandle {
        self.reader.as_ref().unwrap_or(&self.writer)
    }

    async fn ensure_schema(&self) -> TaskStoreResult<()> {
        let writer = &self.writer;
        with_retry(
            "ensure schema",
            || async move {
                let pool = writer.pool().await;
                sqlx::query(SCHEMA_SQL).execute(&pool).await?;
                Ok(())
            },
            || writer.rebuild(),
        )
        .await
    }
}

fn task_from_row(row: &PgRow) -> Result<Task, sqlx::Error> {
    let code: i32 = row.try_get("status")?;
    let status = TaskStatus::from_code(code)
        .ok_or_else(|| sqlx::Error::Decode(format!("unknown status code {code}").into()))?;
    Ok(Task {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        status,
        description: row.try_get("description")?,
    })
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn list(&self) -> TaskStoreResult<Vec<Task>> {
        let handle = self.read_handle();
        with_retry(
            "list tasks",
            || async move {
                let pool = handle.pool().await;
                let rows =
                    sqlx::query("SELECT id, name, status, description FROM tasks ORDER BY id")
                        .fetch_all(&pool)
                        .await?;
                rows.iter().map(task_from_row).collect()
            },
            || handle.rebuild(),
        )
        .await
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

        let writer = &self.writer;
        let code = status.code();
        with_retry(
            "create task",
            || async move {
                let pool = writer.pool().await;
                sqlx::query("INSERT INTO tasks (name, status, description) VALUES ($1, $2, $3)")
                    .bind(name)
                    .bind(code)
                    .bind(description)
                    .execute(&pool)
                    .await?;
                Ok(())
            },
            || writer.rebuild(),
        )
        .await?;
        Ok(true)
    }

    async fn remove(&self, id: i64) -> TaskStoreResult<bool> {
        let writer = &self.writer;
        let removed = with_retry(
            "remove task",
            || async move {
                let pool = writer.pool().await;
                let mut tx = pool.begin().await?;
                match sqlx::query("DELETE FROM tasks WHERE id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await
                {
                    Ok(done) => {
                        tx.commit().await?;
                        Ok(done.rows_affected() > 0)
                    }
                    Err(err) => {
                        rollback(tx).await;
                        Err(err)
                    }
                }
            },
            || writer.rebuild(),
        )
        .await?;

        if !removed {
            tracing::warn!(id, "remove of unknown task id");
        }
        Ok(removed)
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

        let writer = &self.writer;
        let code = status.code();
        with_retry(
            "update task",
            || async move {
                let pool = writer.pool().await;
                let mut tx = pool.begin().await?;
                match sqlx::query(
                    "UPDATE tasks SET name = $2, status = $3, description = $4 WHERE id = $1",
                )
                .bind(id)
                .bind(name)
                .bind(code)
                .bind(description)
                .execute(&mut *tx)
                .await
                {
                    Ok(done) => {
                        tx.commit().await?;
                        Ok(done.rows_affected() > 0)
                    }
                    Err(err) => {
                        rollback(tx).await;
                        Err(err)
                    }
                }
            },
            || writer.rebuild(),
        )
        .await
    }
}

/// Rolls the transaction back explicitly so the pooled connection returns
/// with a clean session; the original error stays the one reported.
async fn rollback(tx: sqlx::Transaction<'_, sqlx::Postgres>) {
    if let Err(err) = tx.rollback().await {
        tracing::error!(error = %err, "transaction rollback failed");
    }
}
