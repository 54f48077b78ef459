use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::net::SocketAddr;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a persistent task in the cluster-wide task directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub String);

impl TaskId {
    /// Shard follow tasks are keyed by the follower index UUID and shard number.
    pub fn for_shard(follower_index_uuid: &str, shard: u32) -> Self {
        Self(format!("{}-{}", follower_index_uuid, shard))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A member of the cluster as seen in a published cluster state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub http_addr: SocketAddr,
}

/// Where the persistent-task framework placed a task.
///
/// `executor_node` is `None` while the task waits for a node to be assigned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Assignment {
    pub executor_node: Option<NodeId>,
    #[serde(default)]
    pub explanation: String,
}

/// One entry of the cluster-wide persistent-task directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistentTask {
    pub id: TaskId,
    /// Name of the task executor, e.g. the shard follow task.
    pub task_name: String,
    /// Executor-specific parameters, opaque to the directory.
    pub params: serde_json::Value,
    pub allocation_id: u64,
    pub assignment: Assignment,
}

impl PersistentTask {
    /// Decodes the params as `T`.
    pub fn params_as<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(self.params.clone())
    }
}

/// The persistent-task directory. Only exists once some persistent task was registered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PersistentTasksMetadata {
    pub last_allocation_id: u64,
    pub tasks: BTreeMap<TaskId, PersistentTask>,
}

impl PersistentTasksMetadata {
    /// Adds a task and bumps the allocation counter.
    pub fn add_task(
        &mut self,
        id: TaskId,
        task_name: &str,
        params: serde_json::Value,
        executor_node: Option<NodeId>,
    ) {
        self.last_allocation_id += 1;
        let task = PersistentTask {
            id: id.clone(),
            task_name: task_name.to_string(),
            params,
            allocation_id: self.last_allocation_id,
            assignment: Assignment {
                executor_node,
                explanation: String::new(),
            },
        };
        self.tasks.insert(id, task);
    }
}

/// Cluster-wide metadata carried by a cluster state.
///
/// `persistent_tasks` is absent on a cluster that never registered a persistent task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_tasks: Option<PersistentTasksMetadata>,
}

/// An immutable, versioned snapshot of the cluster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ClusterState {
    pub version: u64,
    pub nodes: HashMap<NodeId, Node>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl ClusterState {
    /// A state that only knows about the local node.
    pub fn with_local_node(node: Node) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(node.id.clone(), node);
        Self {
            version: 0,
            nodes,
            metadata: Metadata::default(),
        }
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn persistent_tasks(&self) -> Option<&PersistentTasksMetadata> {
        self.metadata.persistent_tasks.as_ref()
    }
}
