//! Executor backed by the local engine.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::models::EngineConfig;
use crate::engine::{ExecutionSpec, LocalEngine};
use crate::executors::base::{ExecutionMode, ExecutionResult, Executor, ExecutorError};
use crate::state::registry::{ProcessRegistry, Termination};

pub struct LocalExecutor {
    engine: LocalEngine,
}

impl LocalExecutor {
    pub fn new(config: EngineConfig, registry: Arc<ProcessRegistry>) -> Self {
        Self {
            engine: LocalEngine::new(config, registry),
        }
    }

    pub fn engine(&self) -> &LocalEngine {
        &self.engine
    }
}

#[async_trait]
impl Executor for LocalExecutor {
    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Local
    }

    async fn run(&self, spec: &ExecutionSpec) -> ExecutionResult {
        match self.engine.execute(spec).await {
            Ok(report) => ExecutionResult::new(report.outcome, report.reports),
            Err(e) => {
                tracing::error!(task_id = %spec.task_id, error = %e, "Local execution failed");
                ExecutionResult::failed()
            }
        }
    }

    /// Best effort: a task with no running process is not an error.
    async fn stop(&self, task_id: &str) -> Result<(), ExecutorError> {
        let Some(handle) = self.engine.registry().mark_stopped(task_id) else {
            tracing::debug!(task_id, "No running process to stop");
            return Ok(());
        };
        match handle.terminate() {
            Termination::Graceful => {
                tracing::info!(task_id, pid = ?handle.pid(), "Sent SIGTERM to engine process");
            }
            Termination::Forced => {
                tracing::info!(task_id, "Requested forced kill of engine process");
            }
        }
        Ok(())
    }
}
