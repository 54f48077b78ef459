//! Follow Stats Service
//!
//! Entry point of a stats request. Takes one cluster-state snapshot, reads the follower
//! tasks out of it, narrows them to the requested indices, gathers their statuses and
//! assembles the response.
//!
//! A request either returns a complete response or fails as a whole. It fails when the
//! request is malformed, when the caller cancels it, or when a newer cluster state drops
//! the persistent-task directory while the gather is in flight.

use super::coordinator::StatsCoordinator;
use super::registry::follower_tasks;
use super::request::StatsRequest;
use super::response::StatsResponses;
use crate::cluster::service::ClusterStateService;
use crate::cluster::types::ClusterState;
use crate::error::{StatsError, StatsResult};

use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

pub struct FollowStatsService {
    cluster: Arc<ClusterStateService>,
    coordinator: StatsCoordinator,
}

impl FollowStatsService {
    pub fn new(cluster: Arc<ClusterStateService>, coordinator: StatsCoordinator) -> Arc<Self> {
        Arc::new(Self {
            cluster,
            coordinator,
        })
    }

    pub async fn stats(&self, request: &StatsRequest) -> StatsResult<StatsResponses> {
        self.stats_with_cancellation(request, CancellationToken::new())
            .await
    }

    pub async fn stats_with_cancellation(
        &self,
        request: &StatsRequest,
        cancel: CancellationToken,
    ) -> StatsResult<StatsResponses> {
        if cancel.is_cancelled() {
            return Err(cancelled("request cancelled by caller"));
        }

        // Subscribe before taking the snapshot so no later state goes unnoticed.
        let mut changes = self.cluster.subscribe();
        let state = changes.borrow_and_update().clone();

        let tasks = request.filter(follower_tasks(&state));
        if tasks.is_empty() {
            tracing::debug!("No follow tasks match {:?}", request);
            return Ok(StatsResponses::default());
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Follow stats request cancelled by caller");
                Err(cancelled("request cancelled by caller"))
            }
            reason = wait_for_directory_removal(&mut changes) => {
                tracing::info!("Follow stats request cancelled: {}", reason);
                Err(cancelled(&reason))
            }
            outcomes = self.coordinator.gather(&state, tasks) => {
                let response = StatsResponses::from_outcomes(outcomes);
                tracing::debug!(
                    "Follow stats: {} statuses, {} task failures, {} node failures",
                    response.stats_responses.len(),
                    response.task_failures.len(),
                    response.node_failures.len()
                );
                Ok(response)
            }
        }
    }
}

/// Resolves once a published state no longer carries the persistent-task directory.
async fn wait_for_directory_removal(changes: &mut watch::Receiver<Arc<ClusterState>>) -> String {
    loop {
        if changes.changed().await.is_err() {
            // Publisher gone: the snapshot can no longer be invalidated.
            std::future::pending::<()>().await;
        }

        let state = changes.borrow_and_update().clone();
        if state.persistent_tasks().is_none() {
            return format!(
                "persistent tasks metadata removed in cluster state version {}",
                state.version
            );
        }
    }
}

fn cancelled(reason: &str) -> StatsError {
    StatsError::Cancelled {
        reason: reason.to_string(),
    }
}
