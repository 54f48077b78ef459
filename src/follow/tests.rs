//! Follow Module Tests
//!
//! ## Test Scopes
//! - **Status Counters**: How progress reports fold into a task status.
//! - **Local Registry**: Start, update, cancel and lookup of node-local tasks.

#[cfg(test)]
mod tests {
    use crate::cluster::types::{NodeId, TaskId};
    use crate::error::TaskQueryError;
    use crate::follow::registry::LocalFollowTasks;
    use crate::follow::types::{ShardFollowTaskParams, ShardFollowTaskStatus, StatusUpdate};

    fn params(index: &str, shard: u32) -> ShardFollowTaskParams {
        ShardFollowTaskParams {
            leader_cluster: "leader_cluster".to_string(),
            leader_index: format!("leader-{}", index),
            follower_index: index.to_string(),
            follower_index_uuid: format!("{}-uuid", index),
            shard,
        }
    }

    // ============================================================
    // STATUS COUNTER TESTS
    // ============================================================

    #[test]
    fn test_initial_status() {
        let status = ShardFollowTaskStatus::initial(&params("follower1", 2));

        assert_eq!(status.follower_index, "follower1");
        assert_eq!(status.shard_id, 2);
        assert_eq!(status.leader_global_checkpoint, -1);
        assert_eq!(status.time_since_last_read_millis, -1);
        assert_eq!(status.operations_behind(), 0);
    }

    #[test]
    fn test_read_then_write_cycle() {
        let mut status = ShardFollowTaskStatus::initial(&params("follower1", 0));

        status.apply(StatusUpdate::LeaderCheckpoints {
            global_checkpoint: 99,
            max_seq_no: 99,
        });
        status.apply(StatusUpdate::ReadStarted { to_seq_no: 63 });
        assert_eq!(status.outstanding_read_requests, 1);

        status.apply(StatusUpdate::ReadCompleted {
            from_seq_no: 0,
            operations: 64,
            bytes: 4096,
            took_millis: 12,
        });
        assert_eq!(status.outstanding_read_requests, 0);
        assert_eq!(status.write_buffer_operation_count, 64);

        status.apply(StatusUpdate::WriteStarted);
        status.apply(StatusUpdate::WriteCompleted {
            operations: 64,
            bytes: 4096,
            took_millis: 5,
        });
        status.apply(StatusUpdate::FollowerCheckpoints {
            global_checkpoint: 63,
            max_seq_no: 63,
            mapping_version: 1,
        });

        assert_eq!(status.operations_read, 64);
        assert_eq!(status.operations_written, 64);
        assert_eq!(status.write_buffer_operation_count, 0);
        assert_eq!(status.write_buffer_size_in_bytes, 0);
        assert_eq!(status.last_requested_seq_no, 63);
        assert_eq!(status.operations_behind(), 36);
        assert!(status.snapshot().time_since_last_read_millis >= 0);
    }

    #[test]
    fn test_read_failures_tracked_until_read_succeeds() {
        let mut status = ShardFollowTaskStatus::initial(&params("follower1", 0));

        status.apply(StatusUpdate::ReadFailed {
            from_seq_no: 10,
            error: "leader unavailable".to_string(),
        });
        status.apply(StatusUpdate::ReadFailed {
            from_seq_no: 10,
            error: "leader still unavailable".to_string(),
        });

        assert_eq!(status.failed_read_requests, 2);
        assert_eq!(status.read_exceptions.len(), 1);
        assert_eq!(status.read_exceptions[0].retries, 1);
        assert_eq!(status.read_exceptions[0].error, "leader still unavailable");

        status.apply(StatusUpdate::ReadCompleted {
            from_seq_no: 10,
            operations: 1,
            bytes: 10,
            took_millis: 1,
        });
        assert!(status.read_exceptions.is_empty());
    }

    #[test]
    fn test_checkpoints_never_move_backwards() {
        let mut status = ShardFollowTaskStatus::initial(&params("follower1", 0));

        status.apply(StatusUpdate::LeaderCheckpoints {
            global_checkpoint: 50,
            max_seq_no: 55,
        });
        status.apply(StatusUpdate::LeaderCheckpoints {
            global_checkpoint: 40,
            max_seq_no: 41,
        });

        assert_eq!(status.leader_global_checkpoint, 50);
        assert_eq!(status.leader_max_seq_no, 55);
    }

    #[test]
    fn test_extreme_reports_saturate() {
        let mut status = ShardFollowTaskStatus::initial(&params("follower1", 0));

        status.apply(StatusUpdate::LeaderCheckpoints {
            global_checkpoint: i64::MAX,
            max_seq_no: i64::MAX,
        });
        for _ in 0..2 {
            status.apply(StatusUpdate::ReadCompleted {
                from_seq_no: 0,
                operations: u64::MAX,
                bytes: u64::MAX,
                took_millis: u64::MAX,
            });
        }

        assert_eq!(status.operations_behind(), i64::MAX as u64);
        assert_eq!(status.operations_read, u64::MAX);
        assert_eq!(status.bytes_read, u64::MAX);
        assert_eq!(status.total_read_time_millis, u64::MAX);
        assert_eq!(status.successful_read_requests, 2);
    }

    #[test]
    fn test_snapshot_carries_lag() {
        let mut status = ShardFollowTaskStatus::initial(&params("follower1", 0));
        status.apply(StatusUpdate::LeaderCheckpoints {
            global_checkpoint: 120,
            max_seq_no: 130,
        });
        status.apply(StatusUpdate::FollowerCheckpoints {
            global_checkpoint: 100,
            max_seq_no: 100,
            mapping_version: 1,
        });

        let snapshot = status.snapshot();
        assert_eq!(snapshot.operations_behind, 20);

        let json = serde_json::to_value(&snapshot).expect("Serialization failed");
        assert_eq!(json["operations_behind"], 20);
    }

    #[test]
    fn test_status_update_wire_format() {
        let update: StatusUpdate = serde_json::from_value(serde_json::json!({
            "type": "fatal",
            "error": "index closed"
        }))
        .expect("Deserialization failed");

        assert_eq!(
            update,
            StatusUpdate::Fatal {
                error: "index closed".to_string()
            }
        );
    }

    // ============================================================
    // LOCAL REGISTRY TESTS
    // ============================================================

    #[test]
    fn test_registry_start_and_status() {
        let registry = LocalFollowTasks::new(NodeId("node-a".to_string()));
        let task_id = TaskId::for_shard("follower1-uuid", 0);

        registry.start_task(task_id.clone(), &params("follower1", 0));

        let status = registry.status(&task_id).expect("Task should report status");
        assert_eq!(status.follower_index, "follower1");
        assert_eq!(registry.task_count(), 1);
    }

    #[test]
    fn test_registry_restart_keeps_counters() {
        let registry = LocalFollowTasks::new(NodeId("node-a".to_string()));
        let task_id = TaskId::for_shard("follower1-uuid", 0);

        registry.start_task(task_id.clone(), &params("follower1", 0));
        registry
            .apply_update(&task_id, StatusUpdate::WriteStarted)
            .unwrap();
        registry.start_task(task_id.clone(), &params("follower1", 0));

        assert_eq!(registry.status(&task_id).unwrap().outstanding_write_requests, 1);
    }

    #[test]
    fn test_registry_unknown_task_is_not_found() {
        let registry = LocalFollowTasks::new(NodeId("node-a".to_string()));
        let task_id = TaskId("missing-0".to_string());

        let result = registry.status(&task_id);

        assert_eq!(
            result.unwrap_err(),
            TaskQueryError::TaskNotFound {
                task_id,
                node: NodeId("node-a".to_string())
            }
        );
    }

    #[test]
    fn test_registry_cancelled_task_fails() {
        let registry = LocalFollowTasks::new(NodeId("node-a".to_string()));
        let task_id = TaskId::for_shard("follower1-uuid", 0);
        registry.start_task(task_id.clone(), &params("follower1", 0));

        registry.cancel_task(&task_id, "unfollow").unwrap();

        match registry.status(&task_id) {
            Err(TaskQueryError::TaskFailed { reason, .. }) => {
                assert!(reason.contains("unfollow"));
            }
            other => panic!("Expected task failure, got {:?}", other),
        }
    }

    #[test]
    fn test_registry_update_unknown_task_errors() {
        let registry = LocalFollowTasks::new(NodeId("node-a".to_string()));
        let result = registry.apply_update(&TaskId("missing-0".to_string()), StatusUpdate::WriteStarted);
        assert!(result.is_err());
    }

    #[test]
    fn test_registry_remove_task() {
        let registry = LocalFollowTasks::new(NodeId("node-a".to_string()));
        let task_id = TaskId::for_shard("follower1-uuid", 0);
        registry.start_task(task_id.clone(), &params("follower1", 0));

        registry.cancel_task(&task_id, "unfollow").unwrap();

        assert!(registry.remove_task(&task_id));
        assert!(!registry.remove_task(&task_id));
        assert_eq!(registry.task_count(), 0);
        assert!(matches!(
            registry.status(&task_id),
            Err(TaskQueryError::TaskNotFound { .. })
        ));
    }
}
