use super::protocol::*;
use super::service::ClusterStateService;
use super::types::ClusterState;

use axum::{Extension, Json, http::StatusCode};
use std::sync::Arc;

pub async fn handle_publish_cluster_state(
    Extension(cluster): Extension<Arc<ClusterStateService>>,
    Json(state): Json<ClusterState>,
) -> (StatusCode, Json<PublishStateResponse>) {
    match cluster.publish(state) {
        Ok(version) => (
            StatusCode::OK,
            Json(PublishStateResponse {
                accepted: true,
                version,
            }),
        ),
        Err(e) => {
            tracing::warn!("Rejected cluster state: {}", e);
            (
                StatusCode::CONFLICT,
                Json(PublishStateResponse {
                    accepted: false,
                    version: cluster.state().version,
                }),
            )
        }
    }
}

pub async fn handle_get_cluster_state(
    Extension(cluster): Extension<Arc<ClusterStateService>>,
) -> Json<ClusterState> {
    Json(cluster.state().as_ref().clone())
}
