//! Cluster Module Tests
//!
//! ## Test Scopes
//! - **Data Structures**: Identifier helpers and JSON shape of published states.
//! - **State Service**: Snapshot isolation, version ordering and change notification.

#[cfg(test)]
mod tests {
    use crate::cluster::service::ClusterStateService;
    use crate::cluster::types::{
        ClusterState, Node, NodeId, PersistentTasksMetadata, TaskId,
    };

    fn local_node() -> Node {
        Node {
            id: NodeId("node-local".to_string()),
            http_addr: "127.0.0.1:6000".parse().unwrap(),
        }
    }

    // ============================================================
    // DATA STRUCTURE TESTS
    // ============================================================

    #[test]
    fn test_task_id_for_shard() {
        let id = TaskId::for_shard("abc123", 4);
        assert_eq!(id.0, "abc123-4");
    }

    #[test]
    fn test_node_id_is_unique() {
        assert_ne!(NodeId::new(), NodeId::new());
    }

    #[test]
    fn test_state_without_metadata_deserializes() {
        // A state published by a cluster that never ran persistent tasks
        let json = serde_json::json!({
            "version": 3,
            "nodes": {
                "node-a": { "id": "node-a", "http_addr": "127.0.0.1:6001" }
            }
        });

        let state: ClusterState = serde_json::from_value(json).expect("Deserialization failed");

        assert_eq!(state.version, 3);
        assert!(state.persistent_tasks().is_none());
        assert!(state.node(&NodeId("node-a".to_string())).is_some());
    }

    #[test]
    fn test_absent_directory_is_not_serialized() {
        let state = ClusterState::with_local_node(local_node());
        let json = serde_json::to_value(&state).unwrap();

        assert!(json["metadata"].get("persistent_tasks").is_none());
    }

    #[test]
    fn test_add_task_bumps_allocation_id() {
        let mut metadata = PersistentTasksMetadata::default();
        metadata.add_task(TaskId("t-0".into()), "some_task", serde_json::json!({}), None);
        metadata.add_task(TaskId("t-1".into()), "some_task", serde_json::json!({}), None);

        assert_eq!(metadata.last_allocation_id, 2);
        assert_eq!(metadata.tasks[&TaskId("t-1".into())].allocation_id, 2);
    }

    // ============================================================
    // STATE SERVICE TESTS
    // ============================================================

    #[test]
    fn test_initial_state_has_only_local_node() {
        let service = ClusterStateService::new(local_node());
        let state = service.state();

        assert_eq!(state.version, 0);
        assert_eq!(state.nodes.len(), 1);
        assert!(state.persistent_tasks().is_none());
    }

    #[test]
    fn test_snapshot_is_stable_across_publish() {
        let service = ClusterStateService::new(local_node());
        let before = service.state();

        let mut next = ClusterState::with_local_node(local_node());
        next.version = 1;
        next.metadata.persistent_tasks = Some(PersistentTasksMetadata::default());
        service.publish(next).unwrap();

        assert!(before.persistent_tasks().is_none(), "Old snapshot must not change");
        assert!(service.state().persistent_tasks().is_some());
    }

    #[test]
    fn test_stale_version_rejected() {
        let service = ClusterStateService::new(local_node());

        let mut v2 = ClusterState::with_local_node(local_node());
        v2.version = 2;
        service.publish(v2).unwrap();

        let mut v1 = ClusterState::with_local_node(local_node());
        v1.version = 1;
        let result = service.publish(v1);

        assert!(result.is_err());
        assert_eq!(service.state().version, 2);
    }

    #[test]
    fn test_only_bootstrap_state_replaced_at_same_version() {
        let service = ClusterStateService::new(local_node());
        assert_eq!(service.state().version, 0);

        let mut first = ClusterState::with_local_node(local_node());
        first.metadata.persistent_tasks = Some(PersistentTasksMetadata::default());
        service.publish(first).unwrap();

        let second = ClusterState::with_local_node(local_node());
        let result = service.publish(second);

        assert!(result.is_err());
        assert!(service.state().persistent_tasks().is_some());
    }

    #[tokio::test]
    async fn test_subscribers_see_new_state() {
        let service = ClusterStateService::new(local_node());
        let mut rx = service.subscribe();

        let mut next = ClusterState::with_local_node(local_node());
        next.version = 7;
        service.publish(next).unwrap();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().version, 7);
    }
}
