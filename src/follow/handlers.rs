use super::protocol::*;
use super::registry::LocalFollowTasks;
use crate::cluster::types::TaskId;
use crate::error::TaskQueryError;

use axum::{Extension, Json, extract::Path, http::StatusCode};
use std::sync::Arc;

pub async fn handle_get_task_status(
    Extension(tasks): Extension<Arc<LocalFollowTasks>>,
    Path(task_id_str): Path<String>,
) -> (StatusCode, Json<TaskStatusResponse>) {
    let task_id = TaskId(task_id_str);
    let node = tasks.node_id().clone();

    match tasks.status(&task_id) {
        Ok(status) => (
            StatusCode::OK,
            Json(TaskStatusResponse {
                task_id,
                node,
                status: Some(status),
                error: None,
            }),
        ),
        Err(e @ TaskQueryError::TaskNotFound { .. }) => {
            tracing::debug!("Status query for unknown task {}", task_id);
            (
                StatusCode::NOT_FOUND,
                Json(TaskStatusResponse {
                    task_id,
                    node,
                    status: None,
                    error: Some(e.to_string()),
                }),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(TaskStatusResponse {
                task_id,
                node,
                status: None,
                error: Some(e.to_string()),
            }),
        ),
    }
}

pub async fn handle_start_task(
    Extension(tasks): Extension<Arc<LocalFollowTasks>>,
    Json(req): Json<StartTaskRequest>,
) -> StatusCode {
    tasks.start_task(req.task_id, &req.params);
    StatusCode::OK
}

pub async fn handle_update_task(
    Extension(tasks): Extension<Arc<LocalFollowTasks>>,
    Json(req): Json<UpdateTaskRequest>,
) -> StatusCode {
    match tasks.apply_update(&req.task_id, req.update) {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!("Failed to apply update: {}", e);
            StatusCode::NOT_FOUND
        }
    }
}

pub async fn handle_cancel_task(
    Extension(tasks): Extension<Arc<LocalFollowTasks>>,
    Json(req): Json<CancelTaskRequest>,
) -> StatusCode {
    match tasks.cancel_task(&req.task_id, &req.reason) {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!("Failed to cancel task: {}", e);
            StatusCode::NOT_FOUND
        }
    }
}

pub async fn handle_remove_task(
    Extension(tasks): Extension<Arc<LocalFollowTasks>>,
    Json(req): Json<RemoveTaskRequest>,
) -> StatusCode {
    if tasks.remove_task(&req.task_id) {
        tracing::info!("Removed follow task {}", req.task_id);
        StatusCode::OK
    } else {
        tracing::warn!("Failed to remove task: {} not found", req.task_id);
        StatusCode::NOT_FOUND
    }
}
