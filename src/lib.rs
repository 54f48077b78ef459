//! Follower Task Stats Library
//!
//! This library crate defines the modules of a cluster node that reports the replication
//! status of follower shard tasks. It serves as the foundation for the node binary
//! (`main.rs`).
//!
//! ## Architecture Modules
//! - **`cluster`**: The cluster state as seen by this node: members plus cluster-wide
//!   metadata, including the persistent-task directory (which may not exist at all).
//! - **`follow`**: The node-local registry of shard follow tasks running here, and the
//!   internal endpoint that answers status queries for them.
//! - **`stats`**: The cluster-wide stats query. Reads follower tasks from a cluster-state
//!   snapshot, scatters status queries to the owning nodes, and gathers statuses, task
//!   failures and node failures into one ordered response.
//! - **`config`** / **`error`**: CLI configuration and error types.

pub mod cluster;
pub mod config;
pub mod error;
pub mod follow;
pub mod stats;

use axum::{
    Extension, Router,
    routing::{get, post},
};
use std::sync::Arc;

use cluster::handlers::{handle_get_cluster_state, handle_publish_cluster_state};
use cluster::protocol::{ENDPOINT_CLUSTER_STATE, ENDPOINT_PUBLISH_CLUSTER_STATE};
use cluster::service::ClusterStateService;
use follow::handlers::{
    handle_cancel_task, handle_get_task_status, handle_remove_task, handle_start_task,
    handle_update_task,
};
use follow::protocol::{
    ENDPOINT_TASK_CANCEL, ENDPOINT_TASK_REMOVE, ENDPOINT_TASK_START, ENDPOINT_TASK_STATUS,
    ENDPOINT_TASK_UPDATE,
};
use follow::registry::LocalFollowTasks;
use stats::handlers::{handle_follow_stats, handle_index_follow_stats};
use stats::protocol::{ENDPOINT_FOLLOW_STATS, ENDPOINT_INDEX_FOLLOW_STATS};
use stats::service::FollowStatsService;

/// Builds the HTTP router of a node.
pub fn router(
    cluster: Arc<ClusterStateService>,
    local_tasks: Arc<LocalFollowTasks>,
    stats: Arc<FollowStatsService>,
) -> Router {
    Router::new()
        .route(ENDPOINT_FOLLOW_STATS, get(handle_follow_stats))
        .route(ENDPOINT_INDEX_FOLLOW_STATS, get(handle_index_follow_stats))
        .route(ENDPOINT_CLUSTER_STATE, get(handle_get_cluster_state))
        .route(ENDPOINT_PUBLISH_CLUSTER_STATE, post(handle_publish_cluster_state))
        .route(
            &format!("{}/:task_id", ENDPOINT_TASK_STATUS),
            get(handle_get_task_status),
        )
        .route(ENDPOINT_TASK_START, post(handle_start_task))
        .route(ENDPOINT_TASK_UPDATE, post(handle_update_task))
        .route(ENDPOINT_TASK_CANCEL, post(handle_cancel_task))
        .route(ENDPOINT_TASK_REMOVE, post(handle_remove_task))
        .layer(Extension(cluster))
        .layer(Extension(local_tasks))
        .layer(Extension(stats))
}
