//! Shard Follow Task Module
//!
//! The node-local side of follower replication status. Each node keeps a registry of the
//! shard follow tasks the persistent-task framework assigned to it and answers status
//! queries for them.
//!
//! ## Submodules
//! - **`types`**: Task params, the status snapshot and the progress reports that feed it.
//! - **`registry`**: `LocalFollowTasks`, the per-node store of running tasks.
//! - **`protocol`**: Internal HTTP endpoints and DTOs.
//! - **`handlers`**: Axum handlers for those endpoints.

pub mod handlers;
pub mod protocol;
pub mod registry;
pub mod types;

#[cfg(test)]
mod tests;
