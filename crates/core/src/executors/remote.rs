//! Executor that delegates to a remote runner.

use async_trait::async_trait;

use crate::config::models::RemoteConfig;
use crate::engine::ExecutionSpec;
use crate::executors::base::{ExecutionMode, ExecutionResult, Executor, ExecutorError};
use crate::remote::RemoteClient;

pub struct RemoteExecutor {
    client: RemoteClient,
}

impl RemoteExecutor {
    pub fn new(config: RemoteConfig) -> Self {
        Self::with_client(RemoteClient::new(config))
    }

    pub fn with_client(client: RemoteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Executor for RemoteExecutor {
    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Remote
    }

    async fn run(&self, spec: &ExecutionSpec) -> ExecutionResult {
        match self.client.run(&spec.to_run_request()).await {
            Ok(response) => ExecutionResult::new(response.status, response.reports),
            Err(e) => {
                tracing::error!(
                    task_id = %spec.task_id,
                    runner = %self.client.base_url(),
                    error = %e,
                    "Remote execution failed"
                );
                ExecutionResult::failed()
            }
        }
    }

    async fn stop(&self, task_id: &str) -> Result<(), ExecutorError> {
        self.client.stop(task_id).await?;
        Ok(())
    }
}
