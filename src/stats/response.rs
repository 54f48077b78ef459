//! Response Aggregation & Ordering
//!
//! Turns the per-task outcomes of a gather into the response handed to the caller:
//! statuses of tasks that answered, failures of tasks that did not, and failures of nodes
//! that could not be talked to.
//!
//! Every queried task lands in exactly one of `stats_responses` and `task_failures`. A
//! node failure is recorded once per node, and each task on that node also gets a task
//! failure, so node trouble never makes a task disappear from the response.

use super::registry::FollowerTaskDescriptor;
use crate::cluster::types::{NodeId, TaskId};
use crate::error::TaskQueryError;
use crate::follow::types::ShardFollowTaskStatus;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Result of querying one task.
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    Success {
        task: FollowerTaskDescriptor,
        node: NodeId,
        status: ShardFollowTaskStatus,
    },
    Failed {
        task: FollowerTaskDescriptor,
        error: TaskQueryError,
    },
}

/// Status of one task that answered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatsResponse {
    pub task_id: TaskId,
    pub node: NodeId,
    pub status: ShardFollowTaskStatus,
}

/// A task whose status could not be obtained.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskFailure {
    pub task_id: TaskId,
    /// Executor node from the directory; `None` for unassigned tasks.
    pub node: Option<NodeId>,
    pub follower_index: String,
    pub shard: u32,
    pub reason: String,
}

/// A node that could not be talked to, reported once per request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeFailure {
    pub node: NodeId,
    pub reason: String,
}

/// The answer to one stats request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatsResponses {
    /// Statuses ordered by follower index, then shard.
    pub stats_responses: Vec<StatsResponse>,
    /// Tasks that did not answer, in discovery order.
    pub task_failures: Vec<TaskFailure>,
    /// Nodes that failed, in discovery order, one entry each.
    pub node_failures: Vec<NodeFailure>,
}

impl StatsResponses {
    /// Builds the response from outcomes given in discovery order.
    ///
    /// Failures keep that order; statuses are sorted by follower index, then shard.
    pub fn from_outcomes(outcomes: Vec<QueryOutcome>) -> Self {
        let mut response = Self::default();
        let mut failed_nodes: HashSet<NodeId> = HashSet::new();

        for outcome in outcomes {
            match outcome {
                QueryOutcome::Success { task, node, status } => {
                    response.stats_responses.push(StatsResponse {
                        task_id: task.task_id,
                        node,
                        status,
                    });
                }
                QueryOutcome::Failed { task, error } => {
                    if let Some(node) = error.failed_node()
                        && failed_nodes.insert(node.clone())
                    {
                        response.node_failures.push(NodeFailure {
                            node: node.clone(),
                            reason: error.to_string(),
                        });
                    }

                    response.task_failures.push(TaskFailure {
                        task_id: task.task_id,
                        node: task.executor_node,
                        follower_index: task.follower_index,
                        shard: task.shard,
                        reason: error.to_string(),
                    });
                }
            }
        }

        response.sort_stats();
        response
    }

    fn sort_stats(&mut self) {
        self.stats_responses.sort_by(|a, b| {
            a.status
                .follower_index
                .cmp(&b.status.follower_index)
                .then(a.status.shard_id.cmp(&b.status.shard_id))
                .then_with(|| a.task_id.cmp(&b.task_id))
        });
    }

    pub fn stats_responses(&self) -> &[StatsResponse] {
        &self.stats_responses
    }

    pub fn task_failures(&self) -> &[TaskFailure] {
        &self.task_failures
    }

    pub fn node_failures(&self) -> &[NodeFailure] {
        &self.node_failures
    }

    /// Number of tasks this response accounts for.
    pub fn task_count(&self) -> usize {
        self.stats_responses.len() + self.task_failures.len()
    }

    /// True when the request matched no task at all.
    pub fn is_empty(&self) -> bool {
        self.stats_responses.is_empty()
            && self.task_failures.is_empty()
            && self.node_failures.is_empty()
    }
}
