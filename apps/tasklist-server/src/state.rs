//! Application state.

use task_store::{TaskService, TaskStoreError};

use crate::config::Config;
use crate::error::ApiError;

/// Shared application state.
pub struct AppState {
    /// Server configuration.
    pub config: Config,
    /// Task service backed by the store chosen at startup.
    pub service: TaskService,
}

impl AppState {
    /// Creates new application state.
    pub fn new(config: Config, service: TaskService) -> Self {
        Self { config, service }
    }

    /// Maps a store failure to the client-safe 503 error, logging the
    /// detail server-side.
    pub fn storage_error(&self, err: TaskStoreError) -> ApiError {
        tracing::error!(error = %err, zone = %self.config.zone, "store operation failed");
        ApiError::StorageUnavailable {
            zone: self.config.zone.clone(),
        }
    }

    /// Builds the 400 validation error.
    pub fn invalid_data(&self) -> ApiError {
        ApiError::InvalidData {
            zone: self.config.zone.clone(),
        }
    }
}
