//! Local execution engine.
//!
//! The LocalEngine runs one task as a child process of this host:
//! 1. Claims the task id in the registry and creates a fresh working
//!    directory under the reports root
//! 2. Writes the script into it
//! 3. Builds the engine command line
//! 4. Runs the process to completion, registered so it can be stopped
//! 5. Harvests the artifacts and decides the outcome

pub mod command;
pub mod harvest;
pub mod layout;
mod process;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bh_protocol::report_models::ReportType;
use bh_protocol::runner::{ReportInfo, RunRequest};
use bh_protocol::script_models::{Script, ScriptKind};
use bh_protocol::task_models::{ExecutionOutcome, Task};
use chrono::Local;
use thiserror::Error;

use crate::classifier;
use crate::config::models::EngineConfig;
use crate::engine::command::EngineCommand;
use crate::engine::layout::ArtifactLayout;
use crate::state::registry::ProcessRegistry;

/// Errors that end an execution before it produced an outcome.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Invalid run request: {0}")]
    InvalidRequest(String),

    #[error("Task '{task_id}' already has a running execution")]
    AlreadyRunning { task_id: String },

    #[error("Failed to create working directory {path}: {source}")]
    WorkDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write script to {path}: {source}")]
    ScriptWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Engine binary '{binary}' not found: {source}")]
    BinaryNotFound {
        binary: String,
        source: which::Error,
    },

    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
}

impl ExecutionError {
    /// Whether the failure happened while preparing the working directory.
    pub fn is_setup(&self) -> bool {
        matches!(self, Self::WorkDir { .. } | Self::ScriptWrite { .. })
    }

    /// Whether the request was refused because the task is still running.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyRunning { .. })
    }
}

/// Everything the engine needs to run one task.
///
/// Built from a stored task and script, or from a runner request that
/// embeds the script content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionSpec {
    pub task_id: String,
    pub task_name: String,
    pub users_count: u32,
    pub spawn_rate: u32,
    pub duration_seconds: u32,
    /// The picked host; blank means "use the engine default".
    pub target_host: String,
    pub jmeter_tpm: Option<u32>,
    pub kind: ScriptKind,
    pub script_content: String,
}

impl ExecutionSpec {
    pub fn from_task(task: &Task, script: &Script, target_host: String) -> Self {
        Self {
            task_id: task.id.clone(),
            task_name: task.name.clone(),
            users_count: task.users_count,
            spawn_rate: task.spawn_rate,
            duration_seconds: task.duration_seconds,
            target_host,
            jmeter_tpm: task.jmeter_tpm,
            kind: script.kind,
            script_content: script.content.clone(),
        }
    }

    /// The wire form sent to a remote runner.
    pub fn to_run_request(&self) -> RunRequest {
        RunRequest {
            task_id: self.task_id.clone(),
            task_name: self.task_name.clone(),
            users_count: i64::from(self.users_count),
            spawn_rate: i64::from(self.spawn_rate),
            duration_seconds: i64::from(self.duration_seconds),
            target_host: self.target_host.clone(),
            jmeter_tpm: self.jmeter_tpm.map(i64::from),
            script_type: self.kind.as_str().to_string(),
            script_content: self.script_content.clone(),
        }
    }
}

impl TryFrom<RunRequest> for ExecutionSpec {
    type Error = ExecutionError;

    /// Validate a runner request.
    ///
    /// Rejects a blank task id or script, non-positive users, spawn rate or
    /// duration, and unknown script types. A non-positive throughput is
    /// ignored rather than rejected.
    fn try_from(request: RunRequest) -> Result<Self, Self::Error> {
        if request.task_id.trim().is_empty() {
            return Err(ExecutionError::InvalidRequest("task_id is required".to_string()));
        }
        if request.script_content.is_empty() {
            return Err(ExecutionError::InvalidRequest(
                "script_content is required".to_string(),
            ));
        }

        let users_count = positive("users_count", request.users_count)?;
        let spawn_rate = positive("spawn_rate", request.spawn_rate)?;
        let duration_seconds = positive("duration_seconds", request.duration_seconds)?;

        let kind = ScriptKind::parse(&request.script_type).ok_or_else(|| {
            ExecutionError::InvalidRequest(format!(
                "unsupported script_type '{}'",
                request.script_type
            ))
        })?;

        let jmeter_tpm = request
            .jmeter_tpm
            .filter(|tpm| *tpm > 0)
            .and_then(|tpm| u32::try_from(tpm).ok());

        Ok(Self {
            task_id: request.task_id,
            task_name: request.task_name,
            users_count,
            spawn_rate,
            duration_seconds,
            target_host: request.target_host.trim().to_string(),
            jmeter_tpm,
            kind,
            script_content: request.script_content,
        })
    }
}

fn positive(field: &str, value: i64) -> Result<u32, ExecutionError> {
    if value <= 0 {
        return Err(ExecutionError::InvalidRequest(format!(
            "{field} must be positive, got {value}"
        )));
    }
    u32::try_from(value)
        .map_err(|_| ExecutionError::InvalidRequest(format!("{field} is too large: {value}")))
}

/// Result of one finished local execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    pub outcome: ExecutionOutcome,
    pub reports: Vec<ReportInfo>,
    pub work_dir: PathBuf,
    pub exit_code: Option<i32>,
}

/// Runs executions as child processes of this host.
pub struct LocalEngine {
    config: EngineConfig,
    registry: Arc<ProcessRegistry>,
}

impl LocalEngine {
    /// Create a new LocalEngine.
    ///
    /// # Arguments
    ///
    /// * `config` - Engine binaries, default host and reports root
    /// * `registry` - Registry that makes running processes stoppable
    pub fn new(config: EngineConfig, registry: Arc<ProcessRegistry>) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ProcessRegistry> {
        &self.registry
    }

    /// Run one execution to completion.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::AlreadyRunning`] while another execution
    /// of the same task is registered, and an error if the working
    /// directory or script file cannot be written, or the engine process
    /// cannot be started. A process that starts and then fails is not an
    /// error; it yields a `Failed` outcome.
    pub async fn execute(&self, spec: &ExecutionSpec) -> Result<ExecutionReport, ExecutionError> {
        let registration = self.registry.register(&spec.task_id).ok_or_else(|| {
            ExecutionError::AlreadyRunning {
                task_id: spec.task_id.clone(),
            }
        })?;

        let work_dir = self.prepare_work_dir(&spec.task_id).await?;
        let layout = ArtifactLayout::new(spec.kind, work_dir);

        let script_path = layout.script_path();
        tokio::fs::write(&script_path, &spec.script_content)
            .await
            .map_err(|source| ExecutionError::ScriptWrite {
                path: script_path.clone(),
                source,
            })?;

        let command = EngineCommand::build(spec, &layout, &self.config);
        which::which(&command.program).map_err(|source| ExecutionError::BinaryNotFound {
            binary: command.program.clone(),
            source,
        })?;

        tracing::info!(
            task_id = %spec.task_id,
            engine = %spec.kind,
            work_dir = %layout.work_dir().display(),
            "Starting engine process"
        );

        let exit = process::run_to_exit(&command, registration).await?;

        let reports = harvest::collect_reports(&layout, &self.config.reports_dir, &spec.task_name).await;

        let classified_failure = match spec.kind {
            ScriptKind::JMeter if reports.iter().any(|r| r.report_type == ReportType::Jtl) => {
                classify(&spec.task_id, layout.results_path()).await
            }
            _ => false,
        };

        let outcome = harvest::decide_outcome(exit.stopped, classified_failure, exit.success);

        tracing::info!(
            task_id = %spec.task_id,
            outcome = %outcome,
            exit_code = ?exit.code,
            reports = reports.len(),
            "Engine process finished"
        );

        Ok(ExecutionReport {
            outcome,
            reports,
            work_dir: layout.work_dir().to_path_buf(),
            exit_code: exit.code,
        })
    }

    /// Create `task_<id>_<timestamp>` under the reports root.
    ///
    /// A numeric suffix is appended if the name is already taken.
    async fn prepare_work_dir(&self, task_id: &str) -> Result<PathBuf, ExecutionError> {
        let root = &self.config.reports_dir;
        tokio::fs::create_dir_all(root)
            .await
            .map_err(|source| ExecutionError::WorkDir {
                path: root.clone(),
                source,
            })?;

        let base = format!(
            "task_{}_{}",
            sanitize_component(task_id),
            Local::now().format("%Y%m%d%H%M%S")
        );

        let mut attempt = 0u32;
        loop {
            let name = if attempt == 0 {
                base.clone()
            } else {
                format!("{base}_{attempt}")
            };
            let path = root.join(name);
            match tokio::fs::create_dir(&path).await {
                Ok(()) => return Ok(path),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => attempt += 1,
                Err(source) => return Err(ExecutionError::WorkDir { path, source }),
            }
        }
    }
}

/// Run the classifier off the async runtime.
///
/// Classification problems are logged and count as "no failures", leaving
/// the outcome to the exit status.
async fn classify(task_id: &str, results_path: PathBuf) -> bool {
    let path = results_path.clone();
    match tokio::task::spawn_blocking(move || classifier::has_failures(&path)).await {
        Ok(Ok(failed)) => failed,
        Ok(Err(e)) => {
            tracing::warn!(
                task_id,
                path = %results_path.display(),
                error = %e,
                "Could not classify results file, using exit status"
            );
            false
        }
        Err(e) => {
            tracing::error!(task_id, error = %e, "Results classification task failed");
            false
        }
    }
}

/// Keep task ids from escaping the reports root.
fn sanitize_component(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Path of `path` relative to `root`, as stored in report records.
pub(crate) fn relative_to(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}
