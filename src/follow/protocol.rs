//! Follow Task Protocol
//!
//! Node-local endpoints for shard follow tasks. The status endpoint is what the stats
//! coordinator on any node calls when a task is assigned here; the start/update/cancel/remove
//! endpoints are the hooks the replication engine uses to report into the local registry.

use super::types::*;
use crate::cluster::types::{NodeId, TaskId};
use serde::{Deserialize, Serialize};

/// Internal endpoint returning the status of one task running on this node.
pub const ENDPOINT_TASK_STATUS: &str = "/internal/follow_task/status";
/// Internal endpoint registering a task that started on this node.
pub const ENDPOINT_TASK_START: &str = "/internal/follow_task/start";
/// Internal endpoint applying a progress report to a running task.
pub const ENDPOINT_TASK_UPDATE: &str = "/internal/follow_task/update";
/// Internal endpoint marking a task as stopping.
pub const ENDPOINT_TASK_CANCEL: &str = "/internal/follow_task/cancel";
/// Internal endpoint dropping a task that stopped executing on this node.
pub const ENDPOINT_TASK_REMOVE: &str = "/internal/follow_task/remove";

/// Answer to a status query.
///
/// Exactly one of `status` and `error` is set.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskStatusResponse {
    pub task_id: TaskId,
    pub node: NodeId,
    pub status: Option<ShardFollowTaskStatus>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StartTaskRequest {
    pub task_id: TaskId,
    pub params: ShardFollowTaskParams,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub task_id: TaskId,
    pub update: StatusUpdate,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CancelTaskRequest {
    pub task_id: TaskId,
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RemoveTaskRequest {
    pub task_id: TaskId,
}
