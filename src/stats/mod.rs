//! Follower Task Stats Module
//!
//! Reports the live replication status of every shard follow task in the cluster, even
//! when the persistent-task directory was never created.
//!
//! ## Request Pipeline
//! 1. **Snapshot**: One cluster state is taken at the start and used throughout.
//! 2. **Registry read**: `registry` lists the follow tasks in that state's task directory.
//!    A missing directory yields no tasks, not an error.
//! 3. **Filter**: `request` keeps the tasks of the requested follower indices.
//! 4. **Scatter-gather**: `coordinator` queries each task's node concurrently through a
//!    `transport`, bounding every query with a timeout, and waits for all of them.
//! 5. **Aggregate**: `response` splits the outcomes into statuses, task failures and node
//!    failures, and sorts the statuses by follower index and shard.
//!
//! ## Submodules
//! - **`service`**: `FollowStatsService`, which runs the pipeline and handles cancellation.
//! - **`handlers`** / **`protocol`**: The public HTTP surface.

pub mod coordinator;
pub mod handlers;
pub mod protocol;
pub mod registry;
pub mod request;
pub mod response;
pub mod service;
pub mod transport;
