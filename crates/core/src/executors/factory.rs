//! Executor selection from configuration.

use std::sync::Arc;

use crate::config::models::AppConfig;
use crate::executors::base::Executor;
use crate::executors::local::LocalExecutor;
use crate::executors::remote::RemoteExecutor;
use crate::state::registry::ProcessRegistry;

/// Build the executor for the configured mode.
///
/// A configured runner URL selects remote delegation; otherwise
/// executions run locally and become stoppable through `registry`.
pub fn build_executor(config: &AppConfig, registry: Arc<ProcessRegistry>) -> Arc<dyn Executor> {
    match config.remote() {
        Some(remote) => {
            tracing::info!(runner = %remote.base_url, "Using remote execution");
            Arc::new(RemoteExecutor::new(remote))
        }
        None => {
            tracing::info!("Using local execution");
            Arc::new(LocalExecutor::new(config.engine(), registry))
        }
    }
}
