//! Cluster State Holder
//!
//! Keeps the most recent cluster state published to this node and lets readers take
//! immutable snapshots of it or subscribe to changes. Publication is driven by the external
//! state propagation layer; this node never mutates a state it received.

use super::types::{ClusterState, Node};

use anyhow::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;

pub struct ClusterStateService {
    pub local_node: Node,
    state: watch::Sender<Arc<ClusterState>>,
    /// Set once a state was published; until then the bootstrap state may be replaced by
    /// any version, including 0.
    published: AtomicBool,
}

impl ClusterStateService {
    /// Starts with a version-0 state containing only the local node and no metadata.
    pub fn new(local_node: Node) -> Arc<Self> {
        let initial = Arc::new(ClusterState::with_local_node(local_node.clone()));
        let (state, _) = watch::channel(initial);
        Arc::new(Self {
            local_node,
            state,
            published: AtomicBool::new(false),
        })
    }

    /// Returns the current snapshot. The snapshot never changes after it is taken.
    pub fn state(&self) -> Arc<ClusterState> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<ClusterState>> {
        self.state.subscribe()
    }

    /// Installs a newer cluster state.
    ///
    /// Once a state has been published, states with a version not greater than the current
    /// one are rejected so that a late publication cannot roll the node back.
    pub fn publish(&self, state: ClusterState) -> Result<u64> {
        let current = self.state.borrow().version;
        if self.published.load(Ordering::SeqCst) && state.version <= current {
            return Err(anyhow::anyhow!(
                "Stale cluster state version {} (current {})",
                state.version,
                current
            ));
        }
        self.published.store(true, Ordering::SeqCst);

        let version = state.version;
        let tasks = state
            .persistent_tasks()
            .map(|metadata| metadata.tasks.len());
        self.state.send_replace(Arc::new(state));

        match tasks {
            Some(count) => tracing::info!(
                "Applied cluster state version {} ({} persistent tasks)",
                version,
                count
            ),
            None => tracing::info!(
                "Applied cluster state version {} (no persistent tasks metadata)",
                version
            ),
        }

        Ok(version)
    }
}
