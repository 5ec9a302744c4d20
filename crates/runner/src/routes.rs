//! HTTP handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use bh_core::engine::ExecutionSpec;
use bh_core::state::registry::Termination;
use bh_protocol::runner::{RunRequest, RunResponse, StopRequest, StopResponse};
use bh_protocol::task_models::ExecutionOutcome;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/run", post(run))
        .route("/stop", post(stop))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// POST /run -- execute a script and answer once it has ended.
///
/// The connection stays open for the whole test. Setup failures answer
/// 500, a task that is still running here answers 409, and a process that
/// cannot be started answers 200 with `failed`.
async fn run(
    State(state): State<AppState>,
    payload: Result<Json<RunRequest>, JsonRejection>,
) -> ApiResult<Json<RunResponse>> {
    let Json(request) = payload?;
    let spec = ExecutionSpec::try_from(request)?;

    tracing::info!(
        task_id = %spec.task_id,
        engine = %spec.kind,
        users = spec.users_count,
        duration_secs = spec.duration_seconds,
        "Run requested"
    );

    match state.engine.execute(&spec).await {
        Ok(report) => Ok(Json(RunResponse {
            status: report.outcome,
            reports: report.reports,
        })),
        Err(e) if e.is_setup() || e.is_conflict() => Err(e.into()),
        Err(e) => {
            tracing::error!(task_id = %spec.task_id, error = %e, "Engine could not be started");
            Ok(Json(RunResponse {
                status: ExecutionOutcome::Failed,
                reports: vec![],
            }))
        }
    }
}

/// POST /stop -- stop a running execution.
async fn stop(
    State(state): State<AppState>,
    payload: Result<Json<StopRequest>, JsonRejection>,
) -> ApiResult<Json<StopResponse>> {
    let Json(request) = payload?;
    let task_id = request.task_id.trim();
    if task_id.is_empty() {
        return Err(ApiError::BadRequest("task_id is required".to_string()));
    }

    let handle = state
        .registry()
        .mark_stopped(task_id)
        .ok_or_else(|| ApiError::NotFound(format!("task '{task_id}' is not running")))?;

    match handle.terminate() {
        Termination::Graceful => tracing::info!(task_id, "Sent SIGTERM to engine process"),
        Termination::Forced => tracing::info!(task_id, "Requested forced kill of engine process"),
    }

    Ok(Json(StopResponse::stopped()))
}
