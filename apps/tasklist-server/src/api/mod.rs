//! API endpoints.

pub mod tasks;

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        // Task endpoints
        .route("/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route("/tasks/:id", delete(tasks::delete_task))
        .route("/tasks/update", post(tasks::update_task))
        // Health check
        .route("/health", get(health_check))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
