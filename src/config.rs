//! Node configuration
//!
//! - CLI argument parsing using clap derive macros
//! - Validated runtime settings for the stats coordinator

use crate::error::ConfigError;
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

const MIN_QUERY_TIMEOUT_MS: u64 = 10;
const MAX_QUERY_TIMEOUT_MS: u64 = 300_000;
const MAX_CONNECT_ATTEMPTS: usize = 10;

/// Cluster node serving follower task stats
#[derive(Parser, Debug, Clone)]
#[command(
    name = "follow-stats-node",
    version,
    about = "Cluster node serving follower replication task stats",
    after_help = "EXAMPLES:\n    \
        follow-stats-node --bind 127.0.0.1:6000\n    \
        follow-stats-node --bind 127.0.0.1:6001 --node-id node-b --query-timeout-ms 2000"
)]
pub struct NodeArgs {
    /// HTTP listen address
    #[arg(long, value_name = "ADDR")]
    pub bind: SocketAddr,

    /// Node identifier (random UUID when omitted)
    #[arg(long, value_name = "ID")]
    pub node_id: Option<String>,

    /// Per-node bound on a single task status query
    #[arg(long, default_value_t = 5_000, value_name = "MS")]
    pub query_timeout_ms: u64,

    /// Connection attempts per status query, within the query timeout
    #[arg(long, default_value_t = 3, value_name = "NUM")]
    pub connect_attempts: usize,
}

impl NodeArgs {
    pub fn stats_config(&self) -> Result<StatsConfig, ConfigError> {
        StatsConfig::new(
            Duration::from_millis(self.query_timeout_ms),
            self.connect_attempts,
        )
    }
}

/// Settings for scatter-gather status queries.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsConfig {
    /// Bound on one status query, after which the node is reported as failed.
    pub query_timeout: Duration,
    /// Connection attempts before a node is reported unreachable.
    pub connect_attempts: usize,
}

impl StatsConfig {
    pub fn new(query_timeout: Duration, connect_attempts: usize) -> Result<Self, ConfigError> {
        let timeout_ms = query_timeout.as_millis() as u64;
        if !(MIN_QUERY_TIMEOUT_MS..=MAX_QUERY_TIMEOUT_MS).contains(&timeout_ms) {
            return Err(ConfigError::InvalidQueryTimeout {
                timeout_ms,
                min: MIN_QUERY_TIMEOUT_MS,
                max: MAX_QUERY_TIMEOUT_MS,
            });
        }
        if connect_attempts == 0 || connect_attempts > MAX_CONNECT_ATTEMPTS {
            return Err(ConfigError::InvalidConnectAttempts {
                attempts: connect_attempts,
                max: MAX_CONNECT_ATTEMPTS,
            });
        }

        Ok(Self {
            query_timeout,
            connect_attempts,
        })
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            query_timeout: Duration::from_secs(5),
            connect_attempts: 3,
        }
    }
}
