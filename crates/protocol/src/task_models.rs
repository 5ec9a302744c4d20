//! Load-test task state models.
//!
//! This module defines the structures for tracking a task from creation
//! through execution to one of its terminal states.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Represents the current lifecycle status of a task.
///
/// The status progresses through these states during normal execution:
/// Created -> Running -> Finished
///
/// Terminal states:
/// - Stopped: Execution was cancelled by request
/// - Finished: Execution completed successfully
/// - Failed: Setup, process or classification failure
///
/// A task in any state other than Running may be (re)started.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Task has been created but never run.
    Created,

    /// An execution is in flight.
    Running,

    /// The last execution was cancelled.
    Stopped,

    /// The last execution completed successfully.
    Finished,

    /// The last execution failed.
    Failed,
}

impl TaskStatus {
    /// Whether this status ends an execution.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped | Self::Finished | Self::Failed)
    }

    /// Whether a task in this status may transition to Running.
    pub fn can_start(self) -> bool {
        self != Self::Running
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Finished => "finished",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single terminal result of one execution.
///
/// Both the local engine and the remote runner produce exactly one of
/// these; it is what the runner reports in its `status` field.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionOutcome {
    Finished,
    Stopped,
    Failed,
}

impl ExecutionOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Finished => "finished",
            Self::Stopped => "stopped",
            Self::Failed => "failed",
        }
    }
}

impl From<ExecutionOutcome> for TaskStatus {
    fn from(outcome: ExecutionOutcome) -> Self {
        match outcome {
            ExecutionOutcome::Finished => TaskStatus::Finished,
            ExecutionOutcome::Stopped => TaskStatus::Stopped,
            ExecutionOutcome::Failed => TaskStatus::Failed,
        }
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to execute a load-testing script against a target for a
/// bounded duration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct Task {
    /// Opaque unique identifier.
    pub id: String,

    pub name: String,

    /// The script this task executes.
    pub script_id: String,

    /// Number of concurrent virtual users.
    pub users_count: u32,

    /// Users spawned per second while ramping up.
    pub spawn_rate: u32,

    /// Wall-clock run time of the load test.
    pub duration_seconds: u32,

    /// Target host stored on the task; a per-run override wins over it.
    pub target_host: Option<String>,

    /// Throughput (transactions per minute) passed to JMeter plans.
    pub jmeter_tpm: Option<u32>,

    pub status: TaskStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// When the current or last execution started.
    pub started_at: Option<DateTime<Utc>>,

    /// When the last execution reached a terminal state.
    ///
    /// Cleared when a new execution starts.
    pub finished_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a task in the Created state.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        script_id: impl Into<String>,
        users_count: u32,
        spawn_rate: u32,
        duration_seconds: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            script_id: script_id.into(),
            users_count,
            spawn_rate,
            duration_seconds,
            target_host: None,
            jmeter_tpm: None,
            status: TaskStatus::Created,
            created_at: now,
            updated_at: now,
            started_at: None,
            finished_at: None,
        }
    }

    pub fn with_target_host(mut self, host: impl Into<String>) -> Self {
        self.target_host = Some(host.into());
        self
    }

    pub fn with_jmeter_tpm(mut self, tpm: u32) -> Self {
        self.jmeter_tpm = Some(tpm);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!TaskStatus::Created.is_terminal());
        assert!(!TaskStatus::Running.is_terminal());
        assert!(TaskStatus::Stopped.is_terminal());
        assert!(TaskStatus::Finished.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
    }

    #[test]
    fn test_only_running_blocks_start() {
        for status in [
            TaskStatus::Created,
            TaskStatus::Stopped,
            TaskStatus::Finished,
            TaskStatus::Failed,
        ] {
            assert!(status.can_start(), "{status} should be startable");
        }
        assert!(!TaskStatus::Running.can_start());
    }

    #[test]
    fn test_outcome_maps_to_status() {
        assert_eq!(TaskStatus::from(ExecutionOutcome::Finished), TaskStatus::Finished);
        assert_eq!(TaskStatus::from(ExecutionOutcome::Stopped), TaskStatus::Stopped);
        assert_eq!(TaskStatus::from(ExecutionOutcome::Failed), TaskStatus::Failed);
    }

    #[test]
    fn test_new_task_is_created() {
        let task = Task::new("t1", "smoke", "s1", 10, 2, 5);
        assert_eq!(task.status, TaskStatus::Created);
        assert!(task.started_at.is_none());
        assert!(task.finished_at.is_none());
        assert!(task.target_host.is_none());
    }
}
