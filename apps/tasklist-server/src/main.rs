//! Tasklist server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use task_store::{MemoryTaskStore, PgTaskStore, TaskService, TaskStore};
use tasklist_server::config::{Config, StoreKind};
use tasklist_server::state::AppState;
use tasklist_server::{create_app, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    tracing::info!(store = ?config.store, zone = %config.zone, "Starting tasklist server");

    // Create the task store selected by configuration
    let store: Arc<dyn TaskStore> = match config.store {
        StoreKind::Memory => Arc::new(MemoryTaskStore::new()),
        StoreKind::Postgres => Arc::new(
            PgTaskStore::connect(&config.database_url, config.database_read_url.as_deref())
                .await?,
        ),
    };
    let service = TaskService::new(store);

    // Create application state
    let state = Arc::new(AppState::new(config.clone(), service));

    // Create application router
    let app = create_app(state);

    // Parse server address
    let addr: SocketAddr = config.server_addr().parse()?;

    tracing::info!(addr = %addr, "Server listening");

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
