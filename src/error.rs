//! Error types for the follower stats service
//!
//! Errors fall into two groups:
//! - Request-level errors (`StatsError`) fail the whole stats call and reach the caller.
//! - Per-query errors (`TaskQueryError`) are captured by the coordinator and surface as
//!   data items (task failures / node failures) inside an otherwise successful response.

use crate::cluster::types::{NodeId, TaskId};
use thiserror::Error;

/// Errors that fail an entire stats request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// The request was malformed and was rejected before any node was contacted
    #[error("Invalid stats request: {reason}")]
    InvalidRequest { reason: String },

    /// The request was abandoned before every query resolved
    #[error("Stats request cancelled: {reason}")]
    Cancelled { reason: String },
}

/// Outcome of a single failed status query against one node.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TaskQueryError {
    /// The node answered but does not run the task
    #[error("Task [{task_id}] not found on node [{node}]")]
    TaskNotFound { task_id: TaskId, node: NodeId },

    /// The node answered but the task could not report its status
    #[error("Task [{task_id}] failed to report status: {reason}")]
    TaskFailed { task_id: TaskId, reason: String },

    /// The directory entry of the task cannot be read as a shard follow task
    #[error("Task [{task_id}] has unreadable params: {reason}")]
    InvalidParams { task_id: TaskId, reason: String },

    /// The task has no executor node assigned
    #[error("Task [{task_id}] is not assigned to any node")]
    Unassigned { task_id: TaskId },

    /// Connection to the node could not be established
    #[error("Node [{node}] unreachable: {reason}")]
    NodeUnreachable { node: NodeId, reason: String },

    /// The node did not answer within the per-query bound
    #[error("Node [{node}] did not respond within {timeout_ms}ms")]
    NodeTimeout { node: NodeId, timeout_ms: u64 },

    /// The node answered with something other than a status or a task error
    #[error("Node [{node}] rejected status query: {status}")]
    NodeRejected { node: NodeId, status: String },
}

impl TaskQueryError {
    /// Whether this error describes the peer itself rather than the task on it.
    pub fn is_node_failure(&self) -> bool {
        matches!(
            self,
            TaskQueryError::NodeUnreachable { .. }
                | TaskQueryError::NodeTimeout { .. }
                | TaskQueryError::NodeRejected { .. }
        )
    }

    /// The node this failure should be charged to, for node-level failures.
    pub fn failed_node(&self) -> Option<&NodeId> {
        match self {
            TaskQueryError::NodeUnreachable { node, .. }
            | TaskQueryError::NodeTimeout { node, .. }
            | TaskQueryError::NodeRejected { node, .. } => Some(node),
            _ => None,
        }
    }
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Per-query timeout out of range
    #[error("Invalid query timeout {timeout_ms}ms: must be between {min}ms and {max}ms")]
    InvalidQueryTimeout { timeout_ms: u64, min: u64, max: u64 },

    /// Connect attempts out of range
    #[error("Invalid connect attempts {attempts}: must be between 1 and {max}")]
    InvalidConnectAttempts { attempts: usize, max: usize },
}

impl axum::response::IntoResponse for StatsError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status = match &self {
            StatsError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            StatsError::Cancelled { .. } => StatusCode::CONFLICT,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

/// Result type alias for StatsError
pub type StatsResult<T> = std::result::Result<T, StatsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_failure_classification() {
        let unreachable = TaskQueryError::NodeUnreachable {
            node: NodeId("node-a".into()),
            reason: "connection refused".into(),
        };
        assert!(unreachable.is_node_failure());
        assert_eq!(unreachable.failed_node(), Some(&NodeId("node-a".into())));

        let not_found = TaskQueryError::TaskNotFound {
            task_id: TaskId("follower1-0".into()),
            node: NodeId("node-a".into()),
        };
        assert!(!not_found.is_node_failure());
        assert_eq!(not_found.failed_node(), None);
    }

    #[test]
    fn test_timeout_message_mentions_bound() {
        let err = TaskQueryError::NodeTimeout {
            node: NodeId("node-b".into()),
            timeout_ms: 250,
        };
        assert_eq!(err.to_string(), "Node [node-b] did not respond within 250ms");
    }
}
