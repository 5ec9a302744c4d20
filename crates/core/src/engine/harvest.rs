//! Artifact harvesting and outcome decision.

use std::path::Path;

use bh_protocol::runner::ReportInfo;
use bh_protocol::task_models::ExecutionOutcome;

use crate::engine::layout::ArtifactLayout;
use crate::engine::relative_to;

/// Report entries for the artifacts that exist in `layout`.
///
/// Missing artifacts are skipped. Paths are relative to `reports_root`.
pub async fn collect_reports(
    layout: &ArtifactLayout,
    reports_root: &Path,
    task_name: &str,
) -> Vec<ReportInfo> {
    let mut reports = Vec::new();
    for artifact in layout.artifacts() {
        let exists = tokio::fs::metadata(&artifact.path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !exists {
            tracing::debug!(path = %artifact.path.display(), "Artifact not produced");
            continue;
        }
        reports.push(ReportInfo {
            name: format!("{task_name}-{}", artifact.label),
            report_type: artifact.report_type,
            file_path: relative_to(&artifact.path, reports_root),
        });
    }
    reports
}

/// Decide the outcome of a completed process.
///
/// A stop request wins over everything. A classified failure or a
/// non-zero exit status fails the run; a clean results file never turns a
/// failed exit into success.
pub fn decide_outcome(stopped: bool, classified_failure: bool, exit_success: bool) -> ExecutionOutcome {
    if stopped {
        ExecutionOutcome::Stopped
    } else if classified_failure || !exit_success {
        ExecutionOutcome::Failed
    } else {
        ExecutionOutcome::Finished
    }
}
