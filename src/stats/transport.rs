//! Node Transport
//!
//! The seam through which the coordinator asks a node for one task's status. The HTTP
//! implementation talks to the follow task endpoints of peer nodes and answers queries
//! addressed to the local node straight from the local registry.
//!
//! Responses are classified here:
//! - `200` with a status: success.
//! - `404` / `500` with a task status body: the node is alive, the task is missing or broken.
//! - anything else, or no answer at all: the node failed.

use crate::cluster::types::{Node, TaskId};
use crate::error::TaskQueryError;
use crate::follow::protocol::{ENDPOINT_TASK_STATUS, TaskStatusResponse};
use crate::follow::registry::LocalFollowTasks;
use crate::follow::types::ShardFollowTaskStatus;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait NodeTransport: Send + Sync {
    /// Asks `node` for the current status of `task_id`.
    async fn task_status(
        &self,
        node: &Node,
        task_id: &TaskId,
    ) -> Result<ShardFollowTaskStatus, TaskQueryError>;
}

/// Talks to peer nodes over their internal follow task endpoint.
pub struct HttpNodeTransport {
    http_client: reqwest::Client,
    /// Registry of this node; queries for tasks assigned here skip HTTP.
    local: Option<Arc<LocalFollowTasks>>,
    /// Attempts per query when the connection cannot be established.
    connect_attempts: usize,
}

/// URL of the status endpoint for `task_id` on `node`.
///
/// Task ids are opaque, so the id is pushed as one percent-encoded path segment.
pub fn task_status_url(node: &Node, task_id: &TaskId) -> Result<Url, TaskQueryError> {
    let invalid = |reason: String| TaskQueryError::NodeUnreachable {
        node: node.id.clone(),
        reason,
    };

    let mut url = Url::parse(&format!("http://{}{}", node.http_addr, ENDPOINT_TASK_STATUS))
        .map_err(|e| invalid(format!("invalid node address: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| invalid("node address cannot carry a path".to_string()))?
        .push(&task_id.0);
    Ok(url)
}

impl HttpNodeTransport {
    /// Creates a transport that tries to connect `connect_attempts` times per query (at least once).
    pub fn new(connect_attempts: usize) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            local: None,
            connect_attempts: connect_attempts.max(1),
        }
    }

    /// Serves queries for the local node from `local` instead of going over HTTP.
    pub fn with_local(mut self, local: Arc<LocalFollowTasks>) -> Self {
        self.local = Some(local);
        self
    }

    /// GET with retry on connection errors only. The caller bounds the total time.
    async fn get_with_retry(&self, url: Url) -> reqwest::Result<reqwest::Response> {
        let mut delay_ms = 50u64;
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.http_client.get(url.clone()).send().await {
                Ok(resp) => return Ok(resp),
                Err(e) if e.is_connect() && attempt < self.connect_attempts => {
                    tracing::trace!("Connect attempt {} to {} failed: {}", attempt, url, e);
                    let jitter = rand::random::<u64>() % 25;
                    tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                    delay_ms = (delay_ms * 2).min(800);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl NodeTransport for HttpNodeTransport {
    async fn task_status(
        &self,
        node: &Node,
        task_id: &TaskId,
    ) -> Result<ShardFollowTaskStatus, TaskQueryError> {
        if let Some(local) = &self.local
            && local.node_id() == &node.id
        {
            tracing::trace!("Task {} served from local registry", task_id);
            return local.status(task_id);
        }

        let url = task_status_url(node, task_id)?;

        let response = self.get_with_retry(url).await.map_err(|e| {
            TaskQueryError::NodeUnreachable {
                node: node.id.clone(),
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        if !matches!(
            status,
            StatusCode::OK | StatusCode::NOT_FOUND | StatusCode::INTERNAL_SERVER_ERROR
        ) {
            return Err(TaskQueryError::NodeRejected {
                node: node.id.clone(),
                status: status.to_string(),
            });
        }

        let body: TaskStatusResponse =
            response
                .json()
                .await
                .map_err(|e| TaskQueryError::NodeRejected {
                    node: node.id.clone(),
                    status: format!("{} with unreadable body: {}", status, e),
                })?;

        match (status, body.status) {
            (StatusCode::OK, Some(task_status)) => Ok(task_status),
            (StatusCode::NOT_FOUND, _) => Err(TaskQueryError::TaskNotFound {
                task_id: task_id.clone(),
                node: node.id.clone(),
            }),
            (_, _) => Err(TaskQueryError::TaskFailed {
                task_id: task_id.clone(),
                reason: body
                    .error
                    .unwrap_or_else(|| "no status reported".to_string()),
            }),
        }
    }
}
