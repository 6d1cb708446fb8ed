//! Task CRUD endpoints.
//!
//! The handlers own field *presence*: a payload missing `name`, `status` or
//! `id` is rejected here with the same 400 body as a store-level validation
//! failure. Field *values* are validated by the store.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use entities::Task;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::state::AppState;

/// Payload for task creation.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Payload for task update.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub id: i64,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Response carrying the full task list.
#[derive(Debug, Serialize)]
pub struct TasksResponse {
    pub tasks: Vec<Task>,
}

async fn current_tasks(state: &AppState) -> ApiResult<TasksResponse> {
    let tasks = state
        .service
        .list()
        .await
        .map_err(|err| state.storage_error(err))?;
    Ok(TasksResponse { tasks })
}

/// Lists all tasks.
pub async fn list_tasks(State(state): State<Arc<AppState>>) -> ApiResult<Json<TasksResponse>> {
    Ok(Json(current_tasks(&state).await?))
}

/// Creates a task and returns the refreshed list.
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TasksResponse>)> {
    let Ok(Json(request)) = payload else {
        return Err(state.invalid_data());
    };

    let created = state
        .service
        .create(&request.name, &request.status, request.description.as_deref())
        .await
        .map_err(|err| state.storage_error(err))?;
    if !created {
        return Err(state.invalid_data());
    }

    tracing::info!(name = %request.name, "task created");
    Ok((StatusCode::CREATED, Json(current_tasks(&state).await?)))
}

/// Deletes a task and returns the refreshed list.
///
/// Responds 200 whether or not the id existed; the store's boolean is
/// deliberately ignored so the route stays idempotent for clients.
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TasksResponse>> {
    state
        .service
        .remove(id)
        .await
        .map_err(|err| state.storage_error(err))?;

    tracing::info!(id, "task delete handled");
    Ok(Json(current_tasks(&state).await?))
}

/// Updates a task and returns the refreshed list.
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TasksResponse>)> {
    let Ok(Json(request)) = payload else {
        return Err(state.invalid_data());
    };

    let updated = state
        .service
        .update(
            request.id,
            &request.name,
            &request.status,
            request.description.as_deref(),
        )
        .await
        .map_err(|err| state.storage_error(err))?;
    if !updated {
        return Err(state.invalid_data());
    }

    tracing::info!(id = request.id, "task updated");
    Ok((StatusCode::CREATED, Json(current_tasks(&state).await?)))
}

#[cfg(test)]
mod tests {
    use task_store::{MemoryTaskStore, TaskService};

    use super::*;
    use crate::config::{Config, StoreKind};
    use crate::error::ApiError;

    fn test_state() -> Arc<AppState> {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 5000,
            store: StoreKind::Memory,
            database_url: String::new(),
            database_read_url: None,
            zone: "A".to_string(),
            log_level: "info".to_string(),
        };
        let service = TaskService::new(Arc::new(MemoryTaskStore::new()));
        Arc::new(AppState::new(config, service))
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let state = test_state();

        let request = CreateTaskRequest {
            name: "Buy milk".to_string(),
            status: "À faire".to_string(),
            description: Some("2% milk".to_string()),
        };
        let (status, Json(body)) = create_task(State(state.clone()), Ok(Json(request)))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.tasks.len(), 1);
        assert_eq!(body.tasks[0].id, 1);

        let Json(body) = list_tasks(State(state)).await.unwrap();
        assert_eq!(body.tasks[0].name, "Buy milk");
    }

    #[tokio::test]
    async fn test_create_with_unknown_status_is_invalid_data() {
        let state = test_state();

        let request = CreateTaskRequest {
            name: "Buy milk".to_string(),
            status: "Done".to_string(),
            description: None,
        };
        let err = create_task(State(state.clone()), Ok(Json(request)))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidData { ref zone } if zone == "A"));

        let Json(body) = list_tasks(State(state)).await.unwrap();
        assert!(body.tasks.is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_200_even_when_absent() {
        let state = test_state();

        let Json(body) = delete_task(State(state), Path(42)).await.unwrap();
        assert!(body.tasks.is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_invalid_data() {
        let state = test_state();

        let request = UpdateTaskRequest {
            id: 7,
            name: "Task".to_string(),
            status: "En cours".to_string(),
            description: None,
        };
        let err = update_task(State(state), Ok(Json(request))).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidData { .. }));
    }

    #[tokio::test]
    async fn test_update_overwrites_fields() {
        let state = test_state();

        let create = CreateTaskRequest {
            name: "Buy milk".to_string(),
            status: "À faire".to_string(),
            description: Some("2% milk".to_string()),
        };
        create_task(State(state.clone()), Ok(Json(create)))
            .await
            .unwrap();

        let update = UpdateTaskRequest {
            id: 1,
            name: "Buy oat milk".to_string(),
            status: "Terminé".to_string(),
            description: None,
        };
        let (status, Json(body)) = update_task(State(state), Ok(Json(update))).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.tasks[0].id, 1);
        assert_eq!(body.tasks[0].name, "Buy oat milk");
        assert_eq!(body.tasks[0].status, entities::TaskStatus::Done);
        assert_eq!(body.tasks[0].description, None);
    }
}
