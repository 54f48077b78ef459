//! Cluster State Module
//!
//! Models the cluster as this node sees it: the set of member nodes and the cluster-wide
//! metadata, including the persistent-task directory that records which background task
//! runs on which node.
//!
//! ## Core Concepts
//! - **Snapshots**: A `ClusterState` is immutable and versioned. Readers take one snapshot
//!   and work against it for the duration of a request.
//! - **Optional directory**: `Metadata::persistent_tasks` is `None` until the first persistent
//!   task is ever registered. Readers must treat that the same as an empty directory.
//! - **Publication**: New states arrive from outside through `ClusterStateService::publish`;
//!   subscribers are notified through a watch channel.

pub mod handlers;
pub mod protocol;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;
