//! Cluster State Protocol
//!
//! Endpoints and DTOs through which the external state propagation layer hands cluster
//! states to a node, and through which operators can inspect the state a node holds.

use serde::{Deserialize, Serialize};

/// Internal endpoint receiving a newly published cluster state.
pub const ENDPOINT_PUBLISH_CLUSTER_STATE: &str = "/internal/cluster_state";
/// Public endpoint returning the node's current cluster state.
pub const ENDPOINT_CLUSTER_STATE: &str = "/cluster/state";

/// Acknowledgment for a cluster state publication.
#[derive(Debug, Serialize, Deserialize)]
pub struct PublishStateResponse {
    /// Whether the node installed the state.
    pub accepted: bool,
    /// The version the node holds after the publication.
    pub version: u64,
}
