use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Task name under which shard follow tasks are registered in the persistent-task directory.
pub const SHARD_FOLLOW_TASK_NAME: &str = "xpack/ccr/shard_follow_task";

/// Parameters the follow workflow stores with each shard follow task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShardFollowTaskParams {
    pub leader_cluster: String,
    pub leader_index: String,
    pub follower_index: String,
    pub follower_index_uuid: String,
    pub shard: u32,
}

/// A read from the leader that failed and is being retried.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadException {
    /// First sequence number of the failed read.
    pub from_seq_no: i64,
    /// How many times this read has been retried.
    pub retries: u32,
    pub error: String,
}

/// Point-in-time status of one shard follow task, as reported by the node running it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShardFollowTaskStatus {
    pub leader_cluster: String,
    pub leader_index: String,
    pub follower_index: String,
    pub shard_id: u32,
    pub leader_global_checkpoint: i64,
    pub leader_max_seq_no: i64,
    pub follower_global_checkpoint: i64,
    pub follower_max_seq_no: i64,
    pub last_requested_seq_no: i64,
    pub outstanding_read_requests: u32,
    pub outstanding_write_requests: u32,
    pub write_buffer_operation_count: u64,
    pub write_buffer_size_in_bytes: u64,
    pub follower_mapping_version: u64,
    pub total_read_time_millis: u64,
    pub successful_read_requests: u64,
    pub failed_read_requests: u64,
    pub operations_read: u64,
    pub bytes_read: u64,
    pub total_write_time_millis: u64,
    pub successful_write_requests: u64,
    pub failed_write_requests: u64,
    pub operations_written: u64,
    pub read_exceptions: Vec<ReadException>,
    /// Milliseconds since the last successful read, `-1` if nothing was read yet.
    pub time_since_last_read_millis: i64,
    pub fatal_exception: Option<String>,
    /// Operations between the follower and leader global checkpoints, as of the snapshot.
    #[serde(default)]
    pub operations_behind: u64,

    #[serde(skip)]
    pub last_read_at: Option<Instant>,
}

impl ShardFollowTaskStatus {
    /// Status of a task that has not exchanged anything with its leader yet.
    pub fn initial(params: &ShardFollowTaskParams) -> Self {
        Self {
            leader_cluster: params.leader_cluster.clone(),
            leader_index: params.leader_index.clone(),
            follower_index: params.follower_index.clone(),
            shard_id: params.shard,
            leader_global_checkpoint: -1,
            leader_max_seq_no: -1,
            follower_global_checkpoint: -1,
            follower_max_seq_no: -1,
            last_requested_seq_no: -1,
            outstanding_read_requests: 0,
            outstanding_write_requests: 0,
            write_buffer_operation_count: 0,
            write_buffer_size_in_bytes: 0,
            follower_mapping_version: 0,
            total_read_time_millis: 0,
            successful_read_requests: 0,
            failed_read_requests: 0,
            operations_read: 0,
            bytes_read: 0,
            total_write_time_millis: 0,
            successful_write_requests: 0,
            failed_write_requests: 0,
            operations_written: 0,
            read_exceptions: Vec::new(),
            time_since_last_read_millis: -1,
            fatal_exception: None,
            operations_behind: 0,
            last_read_at: None,
        }
    }

    /// How many operations the follower is behind the leader's global checkpoint.
    pub fn operations_behind(&self) -> u64 {
        self.leader_global_checkpoint
            .saturating_sub(self.follower_global_checkpoint)
            .max(0) as u64
    }

    /// A copy with time-dependent fields computed as of now.
    pub fn snapshot(&self) -> Self {
        let mut status = self.clone();
        status.time_since_last_read_millis = match self.last_read_at {
            Some(at) => at.elapsed().as_millis() as i64,
            None => -1,
        };
        status.operations_behind = self.operations_behind();
        status
    }

    /// Folds one progress report from the replication engine into the counters.
    pub fn apply(&mut self, update: StatusUpdate) {
        match update {
            StatusUpdate::LeaderCheckpoints {
                global_checkpoint,
                max_seq_no,
            } => {
                self.leader_global_checkpoint = self.leader_global_checkpoint.max(global_checkpoint);
                self.leader_max_seq_no = self.leader_max_seq_no.max(max_seq_no);
            }
            StatusUpdate::FollowerCheckpoints {
                global_checkpoint,
                max_seq_no,
                mapping_version,
            } => {
                self.follower_global_checkpoint =
                    self.follower_global_checkpoint.max(global_checkpoint);
                self.follower_max_seq_no = self.follower_max_seq_no.max(max_seq_no);
                self.follower_mapping_version = self.follower_mapping_version.max(mapping_version);
            }
            StatusUpdate::ReadStarted { to_seq_no } => {
                self.outstanding_read_requests = self.outstanding_read_requests.saturating_add(1);
                self.last_requested_seq_no = self.last_requested_seq_no.max(to_seq_no);
            }
            StatusUpdate::ReadCompleted {
                from_seq_no,
                operations,
                bytes,
                took_millis,
            } => {
                self.outstanding_read_requests = self.outstanding_read_requests.saturating_sub(1);
                self.successful_read_requests = self.successful_read_requests.saturating_add(1);
                self.operations_read = self.operations_read.saturating_add(operations);
                self.bytes_read = self.bytes_read.saturating_add(bytes);
                self.total_read_time_millis = self.total_read_time_millis.saturating_add(took_millis);
                self.write_buffer_operation_count =
                    self.write_buffer_operation_count.saturating_add(operations);
                self.write_buffer_size_in_bytes = self.write_buffer_size_in_bytes.saturating_add(bytes);
                self.read_exceptions.retain(|e| e.from_seq_no != from_seq_no);
                self.last_read_at = Some(Instant::now());
            }
            StatusUpdate::ReadFailed { from_seq_no, error } => {
                self.outstanding_read_requests = self.outstanding_read_requests.saturating_sub(1);
                self.failed_read_requests = self.failed_read_requests.saturating_add(1);
                match self
                    .read_exceptions
                    .iter_mut()
                    .find(|e| e.from_seq_no == from_seq_no)
                {
                    Some(existing) => {
                        existing.retries = existing.retries.saturating_add(1);
                        existing.error = error;
                    }
                    None => self.read_exceptions.push(ReadException {
                        from_seq_no,
                        retries: 0,
                        error,
                    }),
                }
            }
            StatusUpdate::WriteStarted => {
                self.outstanding_write_requests = self.outstanding_write_requests.saturating_add(1);
            }
            StatusUpdate::WriteCompleted {
                operations,
                bytes,
                took_millis,
            } => {
                self.outstanding_write_requests =
                    self.outstanding_write_requests.saturating_sub(1);
                self.successful_write_requests = self.successful_write_requests.saturating_add(1);
                self.operations_written = self.operations_written.saturating_add(operations);
                self.total_write_time_millis =
                    self.total_write_time_millis.saturating_add(took_millis);
                self.write_buffer_operation_count =
                    self.write_buffer_operation_count.saturating_sub(operations);
                self.write_buffer_size_in_bytes = self.write_buffer_size_in_bytes.saturating_sub(bytes);
            }
            StatusUpdate::WriteFailed { .. } => {
                self.outstanding_write_requests =
                    self.outstanding_write_requests.saturating_sub(1);
                self.failed_write_requests = self.failed_write_requests.saturating_add(1);
            }
            StatusUpdate::Fatal { error } => {
                self.fatal_exception = Some(error);
            }
        }
    }
}

/// Progress reports emitted by the replication engine for a running task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatusUpdate {
    LeaderCheckpoints {
        global_checkpoint: i64,
        max_seq_no: i64,
    },
    FollowerCheckpoints {
        global_checkpoint: i64,
        max_seq_no: i64,
        mapping_version: u64,
    },
    ReadStarted {
        to_seq_no: i64,
    },
    ReadCompleted {
        from_seq_no: i64,
        operations: u64,
        bytes: u64,
        took_millis: u64,
    },
    ReadFailed {
        from_seq_no: i64,
        error: String,
    },
    WriteStarted,
    WriteCompleted {
        operations: u64,
        bytes: u64,
        took_millis: u64,
    },
    WriteFailed {
        error: String,
    },
    Fatal {
        error: String,
    },
}
