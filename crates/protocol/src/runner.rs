//! Remote runner wire protocol.
//!
//! This module defines the JSON bodies exchanged between the orchestrator
//! and a remote runner:
//! - `POST /run`: [`RunRequest`] -> [`RunResponse`]
//! - `POST /stop`: [`StopRequest`] -> [`StopResponse`]
//!
//! A run request carries everything the runner needs, including the full
//! script content, so the runner never touches the orchestrator's storage.
//!
//! ```json
//! {
//!   "task_id": "42",
//!   "task_name": "checkout",
//!   "users_count": 10,
//!   "spawn_rate": 2,
//!   "duration_seconds": 60,
//!   "target_host": "https://shop.example.com",
//!   "jmeter_tpm": null,
//!   "script_type": "locust",
//!   "script_content": "from locust import HttpUser, task\n..."
//! }
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::report_models::ReportType;
use crate::task_models::ExecutionOutcome;

/// Body of `POST /run`.
///
/// Numeric fields are signed on the wire so that non-positive values reach
/// validation and are rejected as a client error instead of failing to
/// decode.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct RunRequest {
    pub task_id: String,
    #[serde(default)]
    pub task_name: String,
    pub users_count: i64,
    pub spawn_rate: i64,
    pub duration_seconds: i64,
    /// Already-resolved target host; blank means "runner default".
    #[serde(default)]
    pub target_host: String,
    #[serde(default)]
    pub jmeter_tpm: Option<i64>,
    /// `"locust"` (or blank) / `"jmeter"`.
    #[serde(default)]
    pub script_type: String,
    pub script_content: String,
}

/// One harvested artifact, as reported by an execution.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct ReportInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    /// Path relative to the reports directory of the executing host.
    pub file_path: String,
}

/// Body returned by `POST /run` once the execution has ended.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct RunResponse {
    pub status: ExecutionOutcome,
    #[serde(default)]
    pub reports: Vec<ReportInfo>,
}

/// Body of `POST /stop`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct StopRequest {
    pub task_id: String,
}

/// Body returned by a successful `POST /stop`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct StopResponse {
    pub status: String,
}

impl StopResponse {
    pub fn stopped() -> Self {
        Self {
            status: "stopped".to_string(),
        }
    }
}
