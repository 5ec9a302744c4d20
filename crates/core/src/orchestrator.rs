//! Orchestrator owning task status transitions.
//!
//! `run` moves a task to Running synchronously and hands the execution to
//! a background tokio task, which later persists the reports and the
//! terminal status. `stop` asks the executor to stop and marks the task
//! Stopped.
//!
//! A task has at most one execution in flight. After a stop the task is
//! terminal at once, but it cannot be started again until the stopped
//! execution has wound down.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bh_protocol::report_models::Report;
use bh_protocol::runner::ReportInfo;
use bh_protocol::task_models::{Task, TaskStatus};
use chrono::Utc;
use thiserror::Error;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::engine::ExecutionSpec;
use crate::executors::base::{ExecutionMode, Executor, ExecutorError};
use crate::state::task::{finish_task, start_task, stop_task};
use crate::store::{ReportStore, ScriptStore, StoreError, TaskStore};
use crate::target::pick_target_host;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

impl From<StoreError> for OrchestratorError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Store(other),
        }
    }
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

type InFlight = Arc<Mutex<HashSet<String>>>;

pub struct Orchestrator {
    tasks: Arc<dyn TaskStore>,
    scripts: Arc<dyn ScriptStore>,
    reports: Arc<dyn ReportStore>,
    executor: Arc<dyn Executor>,
    in_flight: InFlight,
}

impl Orchestrator {
    /// Create a new Orchestrator.
    ///
    /// # Arguments
    ///
    /// * `tasks` - Task store, read and updated on every transition
    /// * `scripts` - Script store, read when a run starts
    /// * `reports` - Report store, written when a run ends
    /// * `executor` - Executes runs locally or on a remote runner
    pub fn new(
        tasks: Arc<dyn TaskStore>,
        scripts: Arc<dyn ScriptStore>,
        reports: Arc<dyn ReportStore>,
        executor: Arc<dyn Executor>,
    ) -> Self {
        Self {
            tasks,
            scripts,
            reports,
            executor,
            in_flight: InFlight::default(),
        }
    }

    pub fn mode(&self) -> ExecutionMode {
        self.executor.mode()
    }

    /// Whether an execution of `task_id` has not ended yet.
    pub fn is_in_flight(&self, task_id: &str) -> bool {
        lock(&self.in_flight).contains(task_id)
    }

    /// Start a task and return it in the Running state.
    ///
    /// A task that is already running, or whose stopped execution is still
    /// winding down, is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::NotFound`] if the task or its script
    /// does not exist, or a store error if the Running state cannot be
    /// persisted.
    pub async fn run(&self, task_id: &str, target_override: Option<&str>) -> OrchestratorResult<Task> {
        let (task, _handle) = self.run_with_handle(task_id, target_override).await?;
        Ok(task)
    }

    /// Like [`Orchestrator::run`], also returning the background execution.
    ///
    /// The handle resolves to the task as persisted after the execution
    /// ended. It is `None` when no execution was started.
    pub async fn run_with_handle(
        &self,
        task_id: &str,
        target_override: Option<&str>,
    ) -> OrchestratorResult<(Task, Option<JoinHandle<Task>>)> {
        let mut task = self.tasks.get(task_id).await?;
        if !task.status.can_start() {
            tracing::info!(task_id, "Task is already running");
            return Ok((task, None));
        }
        let Some(claim) = InFlightClaim::acquire(&self.in_flight, task_id) else {
            tracing::info!(task_id, status = %task.status, "Previous execution is still winding down");
            return Ok((task, None));
        };

        let script = self.scripts.get(&task.script_id).await?;
        let target_host = pick_target_host(target_override, task.target_host.as_deref());
        let spec = ExecutionSpec::from_task(&task, &script, target_host);

        start_task(&mut task, Utc::now());
        self.tasks.update(&task).await?;

        tracing::info!(
            task_id,
            mode = %self.executor.mode(),
            engine = %spec.kind,
            "Task started"
        );

        let handle = tokio::spawn(execute_in_background(
            task.clone(),
            spec,
            Arc::clone(&self.tasks),
            Arc::clone(&self.reports),
            Arc::clone(&self.executor),
            claim,
        ));

        Ok((task, Some(handle)))
    }

    /// Stop a task and return it in the Stopped state.
    ///
    /// A task that already reached a terminal state is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::Executor`] if a remote runner could not
    /// be told to stop; the task is then left as it was.
    pub async fn stop(&self, task_id: &str) -> OrchestratorResult<Task> {
        let mut task = self.tasks.get(task_id).await?;
        if task.status.is_terminal() {
            return Ok(task);
        }

        if let Err(e) = self.executor.stop(task_id).await {
            tracing::error!(task_id, error = %e, "Failed to stop task");
            return Err(e.into());
        }

        stop_task(&mut task, Utc::now());
        self.tasks.update(&task).await?;
        tracing::info!(task_id, "Task stopped");
        Ok(task)
    }
}

fn lock(in_flight: &InFlight) -> MutexGuard<'_, HashSet<String>> {
    in_flight.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks one task id as having an execution in flight until dropped.
struct InFlightClaim {
    in_flight: InFlight,
    task_id: String,
}

impl InFlightClaim {
    fn acquire(in_flight: &InFlight, task_id: &str) -> Option<Self> {
        if !lock(in_flight).insert(task_id.to_string()) {
            return None;
        }
        Some(Self {
            in_flight: Arc::clone(in_flight),
            task_id: task_id.to_string(),
        })
    }
}

impl Drop for InFlightClaim {
    fn drop(&mut self) {
        lock(&self.in_flight).remove(&self.task_id);
    }
}

/// Execute one run and persist its reports, then its terminal status.
///
/// The terminal status is only written while the stored task still
/// belongs to this run, i.e. its `started_at` is unchanged.
async fn execute_in_background(
    started: Task,
    spec: ExecutionSpec,
    tasks: Arc<dyn TaskStore>,
    reports: Arc<dyn ReportStore>,
    executor: Arc<dyn Executor>,
    _claim: InFlightClaim,
) -> Task {
    let result = executor.run(&spec).await;

    for info in &result.reports {
        let report = new_report(&started, info);
        if let Err(e) = reports.create(&report).await {
            tracing::error!(task_id = %started.id, report = %info.name, error = %e, "Failed to save report");
        }
    }

    let mut task = match tasks.get(&started.id).await {
        Ok(task) => task,
        Err(e) => {
            tracing::warn!(task_id = %started.id, error = %e, "Could not reload task, using cached copy");
            started.clone()
        }
    };
    if task.started_at != started.started_at {
        tracing::warn!(
            task_id = %task.id,
            outcome = %result.outcome,
            "Task was restarted elsewhere, discarding this run's outcome"
        );
        return task;
    }
    if task.status == TaskStatus::Stopped && TaskStatus::from(result.outcome) != TaskStatus::Stopped {
        tracing::info!(
            task_id = %task.id,
            outcome = %result.outcome,
            "Stop arrived after the execution ended, keeping its outcome"
        );
    }
    finish_task(&mut task, result.outcome, Utc::now());

    if let Err(e) = tasks.update(&task).await {
        tracing::error!(task_id = %task.id, error = %e, "Failed to save task status");
    } else {
        tracing::info!(
            task_id = %task.id,
            status = %task.status,
            reports = result.reports.len(),
            "Task finished"
        );
    }
    task
}

fn new_report(task: &Task, info: &ReportInfo) -> Report {
    Report {
        id: Uuid::new_v4().to_string(),
        task_id: Some(task.id.clone()),
        task_name: Some(task.name.clone()),
        name: info.name.clone(),
        report_type: info.report_type,
        file_path: info.file_path.clone(),
        created_at: Utc::now(),
    }
}
