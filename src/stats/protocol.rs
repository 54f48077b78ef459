//! Follow Stats Protocol
//!
//! Public endpoints for follower task stats and their query parameters.

use serde::{Deserialize, Serialize};

/// Stats for every follower index, or for the ones listed in `?indices=a,b`.
pub const ENDPOINT_FOLLOW_STATS: &str = "/follow/stats";
/// Stats for a single follower index named in the path.
pub const ENDPOINT_INDEX_FOLLOW_STATS: &str = "/follow/stats/:index";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StatsParams {
    /// Comma-separated follower index names.
    pub indices: Option<String>,
}
