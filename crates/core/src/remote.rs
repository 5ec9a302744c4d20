//! HTTP client for delegating executions to a remote runner.
//!
//! Wraps the runner's `POST /run` and `POST /stop` endpoints using
//! [`reqwest`].

use std::time::Duration;

use bh_protocol::runner::{RunRequest, RunResponse, StopRequest};
use reqwest::StatusCode;

use crate::config::models::RemoteConfig;

/// Errors from the remote runner client.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The HTTP request itself failed (connect, timeout, TLS).
    #[error("Runner request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The runner answered with a non-2xx status.
    #[error("Runner returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The runner answered 2xx with a body that is not a run response.
    #[error("Invalid runner response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

/// Client for one remote runner.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: reqwest::Client,
    base_url: String,
    timeout_margin: Duration,
    stop_timeout: Duration,
}

impl RemoteClient {
    pub fn new(config: RemoteConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Reuse an existing [`reqwest::Client`] for connection pooling.
    pub fn with_client(client: reqwest::Client, config: RemoteConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_margin: config.timeout_margin,
            stop_timeout: config.stop_timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run an execution on the runner and wait for its result.
    ///
    /// The request times out after the test duration plus the configured
    /// margin.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, timeout, a non-2xx status or
    /// an undecodable body.
    pub async fn run(&self, request: &RunRequest) -> Result<RunResponse, RemoteError> {
        let duration = u64::try_from(request.duration_seconds).unwrap_or(0);
        let timeout = Duration::from_secs(duration) + self.timeout_margin;

        tracing::info!(
            task_id = %request.task_id,
            runner = %self.base_url,
            timeout_secs = timeout.as_secs(),
            "Delegating execution to remote runner"
        );

        let response = self
            .client
            .post(format!("{}/run", self.base_url))
            .timeout(timeout)
            .json(request)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Ask the runner to stop an execution.
    ///
    /// A 404 means the runner no longer tracks the task, which is treated
    /// as success.
    pub async fn stop(&self, task_id: &str) -> Result<(), RemoteError> {
        let response = self
            .client
            .post(format!("{}/stop", self.base_url))
            .timeout(self.stop_timeout)
            .json(&StopRequest {
                task_id: task_id.to_string(),
            })
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(task_id, "Runner was not tracking the task");
            return Ok(());
        }
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<failed to read body: {e}>"));
        Err(RemoteError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
