//! Local Follow Task Registry
//!
//! Tracks the shard follow tasks executing on this node together with their live status.
//! The replication engine reports progress into this registry; status queries read a fresh
//! snapshot out of it. Nothing here is replicated: when the node goes away, so do its
//! entries.

use super::types::*;
use crate::cluster::types::{NodeId, TaskId};
use crate::error::TaskQueryError;

use anyhow::Result;
use dashmap::DashMap;
use std::sync::Arc;

struct LocalTask {
    /// Live counters, updated in place by progress reports.
    status: ShardFollowTaskStatus,
    /// Set once the task was asked to stop; it no longer reports status.
    cancelled: Option<String>,
}

/// Shard follow tasks executing on this node, keyed by task id.
pub struct LocalFollowTasks {
    /// Node these tasks run on; reported back in status answers.
    node_id: NodeId,
    tasks: DashMap<TaskId, LocalTask>,
}

impl LocalFollowTasks {
    /// Creates an empty registry for `node_id`.
    pub fn new(node_id: NodeId) -> Arc<Self> {
        Arc::new(Self {
            node_id,
            tasks: DashMap::new(),
        })
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    /// Registers a task that started executing on this node.
    ///
    /// Starting an already running task keeps its counters.
    pub fn start_task(&self, task_id: TaskId, params: &ShardFollowTaskParams) {
        if self.tasks.contains_key(&task_id) {
            tracing::debug!("Task {} already running", task_id);
            return;
        }

        self.tasks.insert(
            task_id.clone(),
            LocalTask {
                status: ShardFollowTaskStatus::initial(params),
                cancelled: None,
            },
        );

        tracing::info!(
            "Started follow task {} for [{}][{}]",
            task_id,
            params.follower_index,
            params.shard
        );
    }

    /// Marks a task as stopping. Its status is no longer available.
    pub fn cancel_task(&self, task_id: &TaskId, reason: &str) -> Result<()> {
        let mut task = self
            .tasks
            .get_mut(task_id)
            .ok_or_else(|| anyhow::anyhow!("Task {} not found", task_id))?;
        task.cancelled = Some(reason.to_string());
        tracing::info!("Cancelled follow task {}: {}", task_id, reason);
        Ok(())
    }

    /// Removes a task that stopped executing on this node.
    ///
    /// Returns `false` if the task was not registered. Status queries for a removed task
    /// answer "not found".
    pub fn remove_task(&self, task_id: &TaskId) -> bool {
        self.tasks.remove(task_id).is_some()
    }

    /// Applies a progress report from the replication engine.
    pub fn apply_update(&self, task_id: &TaskId, update: StatusUpdate) -> Result<()> {
        let mut task = self
            .tasks
            .get_mut(task_id)
            .ok_or_else(|| anyhow::anyhow!("Task {} not found", task_id))?;
        tracing::trace!("Task {} update: {:?}", task_id, update);
        task.status.apply(update);
        Ok(())
    }

    /// Reads the current status of a task.
    pub fn status(&self, task_id: &TaskId) -> Result<ShardFollowTaskStatus, TaskQueryError> {
        let task = self
            .tasks
            .get(task_id)
            .ok_or_else(|| TaskQueryError::TaskNotFound {
                task_id: task_id.clone(),
                node: self.node_id.clone(),
            })?;

        if let Some(reason) = &task.cancelled {
            return Err(TaskQueryError::TaskFailed {
                task_id: task_id.clone(),
                reason: format!("task is cancelled: {}", reason),
            });
        }

        Ok(task.status.snapshot())
    }

    /// Number of registered tasks, cancelled ones included.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}
