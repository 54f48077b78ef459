//! Task Registry Reader
//!
//! Extracts the shard follow tasks from a cluster-state snapshot.
//!
//! A cluster that never registered any persistent task has no task directory at all. That
//! is a normal state and reads as an empty task set, exactly like a directory that exists
//! but holds no follow tasks.
//!
//! A follow task whose params cannot be decoded is still listed, carrying the decode error,
//! so that it surfaces as a task failure instead of vanishing from the response.

use crate::cluster::types::{ClusterState, NodeId, PersistentTask, TaskId};
use crate::follow::types::{SHARD_FOLLOW_TASK_NAME, ShardFollowTaskParams};

use serde::{Deserialize, Serialize};

/// One shard follow task as recorded in the persistent-task directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FollowerTaskDescriptor {
    pub task_id: TaskId,
    pub follower_index: String,
    pub shard: u32,
    /// Node the framework assigned the task to, if any.
    pub executor_node: Option<NodeId>,
    /// Why the params could not be decoded. Such a task is reported, never queried.
    pub params_error: Option<String>,
}

impl FollowerTaskDescriptor {
    fn from_task(task: &PersistentTask) -> Option<Self> {
        if task.task_name != SHARD_FOLLOW_TASK_NAME {
            return None;
        }

        let descriptor = match task.params_as::<ShardFollowTaskParams>() {
            Ok(params) => Self {
                task_id: task.id.clone(),
                follower_index: params.follower_index,
                shard: params.shard,
                executor_node: task.assignment.executor_node.clone(),
                params_error: None,
            },
            Err(e) => {
                tracing::warn!("Follow task {} has unreadable params: {}", task.id, e);
                // Keep whatever identity is readable so the failure can still be filtered.
                Self {
                    task_id: task.id.clone(),
                    follower_index: task
                        .params
                        .get("follower_index")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string(),
                    shard: task
                        .params
                        .get("shard")
                        .and_then(|v| v.as_u64())
                        .and_then(|v| u32::try_from(v).ok())
                        .unwrap_or_default(),
                    executor_node: task.assignment.executor_node.clone(),
                    params_error: Some(e.to_string()),
                }
            }
        };

        Some(descriptor)
    }
}

/// Lists the follower tasks known to `state`, in directory order.
pub fn follower_tasks(state: &ClusterState) -> Vec<FollowerTaskDescriptor> {
    let Some(metadata) = state.persistent_tasks() else {
        tracing::debug!(
            "Cluster state {} has no persistent tasks metadata",
            state.version
        );
        return Vec::new();
    };

    metadata
        .tasks
        .values()
        .filter_map(FollowerTaskDescriptor::from_task)
        .collect()
}
