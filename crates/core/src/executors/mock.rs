//! Scripted executor for testing.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use bh_protocol::runner::ReportInfo;
use bh_protocol::task_models::ExecutionOutcome;
use tokio::sync::Notify;

use crate::engine::ExecutionSpec;
use crate::executors::base::{ExecutionMode, ExecutionResult, Executor, ExecutorError};
use crate::remote::RemoteError;

#[derive(Clone)]
pub struct MockExecutor {
    outcome: ExecutionOutcome,
    reports: Vec<ReportInfo>,
    until_stopped: bool,
    stop_fails: bool,
    stop_signal: Arc<Notify>,
    runs: Arc<Mutex<Vec<ExecutionSpec>>>,
    stops: Arc<Mutex<Vec<String>>>,
}

impl MockExecutor {
    /// Completes immediately with `outcome`.
    pub fn finishing(outcome: ExecutionOutcome) -> Self {
        Self {
            outcome,
            reports: vec![],
            until_stopped: false,
            stop_fails: false,
            stop_signal: Arc::new(Notify::new()),
            runs: Arc::new(Mutex::new(Vec::new())),
            stops: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Runs until `stop` is called, then reports `Stopped`.
    pub fn until_stopped() -> Self {
        Self {
            until_stopped: true,
            ..Self::finishing(ExecutionOutcome::Stopped)
        }
    }

    pub fn with_reports(mut self, reports: Vec<ReportInfo>) -> Self {
        self.reports = reports;
        self
    }

    /// Make `stop` fail the way an unreachable runner does.
    pub fn with_failing_stop(mut self) -> Self {
        self.stop_fails = true;
        self
    }

    pub fn runs(&self) -> Vec<ExecutionSpec> {
        self.runs.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn stop_calls(&self) -> Vec<String> {
        self.stops.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl Executor for MockExecutor {
    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Local
    }

    async fn run(&self, spec: &ExecutionSpec) -> ExecutionResult {
        self.runs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(spec.clone());
        if self.until_stopped {
            self.stop_signal.notified().await;
        }
        ExecutionResult::new(self.outcome, self.reports.clone())
    }

    async fn stop(&self, task_id: &str) -> Result<(), ExecutorError> {
        self.stops
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(task_id.to_string());
        if self.stop_fails {
            return Err(RemoteError::Status {
                status: 502,
                body: "runner unavailable".to_string(),
            }
            .into());
        }
        self.stop_signal.notify_one();
        Ok(())
    }
}
