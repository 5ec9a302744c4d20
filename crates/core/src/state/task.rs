//! Task state machine implementation.
//!
//! These functions apply the status transitions of a [`Task`]. Persisting
//! the result is the caller's job.

use bh_protocol::task_models::{ExecutionOutcome, Task, TaskStatus};
use chrono::{DateTime, Utc};

/// Transition the task to Running for a new execution.
///
/// Sets the start time and clears the finish time of any previous run.
pub fn start_task(task: &mut Task, now: DateTime<Utc>) {
    task.status = TaskStatus::Running;
    task.started_at = Some(now);
    task.finished_at = None;
    task.updated_at = now;
}

/// Record the terminal outcome of an execution.
pub fn finish_task(task: &mut Task, outcome: ExecutionOutcome, now: DateTime<Utc>) {
    task.status = outcome.into();
    task.finished_at = Some(now);
    task.updated_at = now;
}

/// Mark the task stopped by request.
///
/// A task that somehow never recorded a start gets one now, so that
/// `started_at <= finished_at` always holds for stopped tasks.
pub fn stop_task(task: &mut Task, now: DateTime<Utc>) {
    task.status = TaskStatus::Stopped;
    task.started_at.get_or_insert(now);
    task.finished_at = Some(now);
    task.updated_at = now;
}
