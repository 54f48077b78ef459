//! Scatter-Gather Coordinator
//!
//! Issues one status query per follower task, all at once, each to the node the task is
//! assigned to, and waits until every query has resolved. Each query is bounded by the
//! configured timeout; a query that runs out of time counts as a failure of its node and
//! does not hold up or abort the others.

use super::registry::FollowerTaskDescriptor;
use super::response::QueryOutcome;
use super::transport::NodeTransport;
use crate::cluster::types::ClusterState;
use crate::config::StatsConfig;
use crate::error::TaskQueryError;

use futures::future::join_all;
use std::sync::Arc;

/// Fans status queries out to the owning nodes and collects one outcome per task.
pub struct StatsCoordinator {
    /// How a single node is asked for a task's status.
    transport: Arc<dyn NodeTransport>,
    /// Per-query timeout and connect budget.
    config: StatsConfig,
}

impl StatsCoordinator {
    pub fn new(transport: Arc<dyn NodeTransport>, config: StatsConfig) -> Self {
        Self { transport, config }
    }

    /// Queries every task concurrently and returns one outcome per task, in input order.
    ///
    /// Node addresses are resolved against `state`, the same snapshot the tasks were read
    /// from.
    pub async fn gather(
        &self,
        state: &ClusterState,
        tasks: Vec<FollowerTaskDescriptor>,
    ) -> Vec<QueryOutcome> {
        tracing::debug!(
            "Querying {} follow tasks (cluster state {})",
            tasks.len(),
            state.version
        );

        let queries = tasks.into_iter().map(|task| self.query_task(state, task));
        join_all(queries).await
    }

    async fn query_task(&self, state: &ClusterState, task: FollowerTaskDescriptor) -> QueryOutcome {
        if let Some(reason) = task.params_error.clone() {
            let error = TaskQueryError::InvalidParams {
                task_id: task.task_id.clone(),
                reason,
            };
            return QueryOutcome::Failed { task, error };
        }

        let Some(node_id) = task.executor_node.clone() else {
            let error = TaskQueryError::Unassigned {
                task_id: task.task_id.clone(),
            };
            return QueryOutcome::Failed { task, error };
        };

        let Some(node) = state.node(&node_id) else {
            let error = TaskQueryError::NodeUnreachable {
                node: node_id,
                reason: "node is not part of the cluster state".to_string(),
            };
            return QueryOutcome::Failed { task, error };
        };

        let query = self.transport.task_status(node, &task.task_id);
        let result = tokio::time::timeout(self.config.query_timeout, query).await;
        match result {
            Ok(Ok(status)) => {
                tracing::trace!("Task {} answered from {}", task.task_id, node.id);
                QueryOutcome::Success {
                    task,
                    node: node_id,
                    status,
                }
            }
            Ok(Err(error)) => {
                tracing::warn!("Status query for task {} failed: {}", task.task_id, error);
                QueryOutcome::Failed { task, error }
            }
            Err(_) => {
                let error = TaskQueryError::NodeTimeout {
                    node: node_id,
                    timeout_ms: self.config.query_timeout.as_millis() as u64,
                };
                tracing::warn!("Status query for task {} failed: {}", task.task_id, error);
                QueryOutcome::Failed { task, error }
            }
        }
    }
}
