//! Report artifact models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Kind of artifact a report points at.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    /// Rendered HTML summary.
    Html,
    /// Locust CSV statistics.
    Csv,
    /// Raw JMeter results file.
    Jtl,
    /// Any tag this version does not know about.
    #[serde(other)]
    Other,
}

impl ReportType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Csv => "csv",
            Self::Jtl => "jtl",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated artifact recorded after an execution.
///
/// Reports are created once, as a side effect of a completed or stopped
/// execution, and never mutated afterwards.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct Report {
    pub id: String,

    /// The task whose execution produced this report.
    pub task_id: Option<String>,

    /// Task name at the time the report was created.
    pub task_name: Option<String>,

    /// Human-readable display name.
    pub name: String,

    #[serde(rename = "type")]
    pub report_type: ReportType,

    /// Path relative to the configured reports directory.
    pub file_path: String,

    pub created_at: DateTime<Utc>,
}
