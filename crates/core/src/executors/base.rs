//! Executor trait and supporting types.

use std::fmt;

use async_trait::async_trait;
use bh_protocol::runner::ReportInfo;
use bh_protocol::task_models::ExecutionOutcome;
use thiserror::Error;

use crate::engine::ExecutionSpec;
use crate::remote::RemoteError;

/// Where executions run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Child processes of this host.
    Local,
    /// Delegated to a remote runner over HTTP.
    Remote,
}

impl ExecutionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome of one execution plus its harvested reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub outcome: ExecutionOutcome,
    pub reports: Vec<ReportInfo>,
}

impl ExecutionResult {
    pub fn new(outcome: ExecutionOutcome, reports: Vec<ReportInfo>) -> Self {
        Self { outcome, reports }
    }

    /// A failure that produced nothing.
    pub fn failed() -> Self {
        Self::new(ExecutionOutcome::Failed, Vec::new())
    }
}

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("Remote stop failed: {0}")]
    Remote(#[from] RemoteError),
}

/// Runs and stops executions in one mode.
///
/// `run` never fails: every error along the way resolves to a
/// [`ExecutionOutcome::Failed`] result. Only `stop` can report an error,
/// when the real state of the execution is unknown.
#[async_trait]
pub trait Executor: Send + Sync {
    fn mode(&self) -> ExecutionMode;

    async fn run(&self, spec: &ExecutionSpec) -> ExecutionResult;

    async fn stop(&self, task_id: &str) -> Result<(), ExecutorError>;
}
