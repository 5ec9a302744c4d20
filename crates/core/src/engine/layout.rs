//! File layout of an execution's working directory.

use std::path::{Path, PathBuf};

use bh_protocol::report_models::ReportType;
use bh_protocol::script_models::ScriptKind;

/// An artifact an engine may leave behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    /// Appended to the task name to form the report name.
    pub label: &'static str,
    pub report_type: ReportType,
}

/// Where the script and artifacts of one execution live.
#[derive(Debug, Clone)]
pub struct ArtifactLayout {
    kind: ScriptKind,
    work_dir: PathBuf,
}

impl ArtifactLayout {
    pub fn new(kind: ScriptKind, work_dir: PathBuf) -> Self {
        Self { kind, work_dir }
    }

    pub fn kind(&self) -> ScriptKind {
        self.kind
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn script_path(&self) -> PathBuf {
        match self.kind {
            ScriptKind::Locust => self.work_dir.join("locustfile.py"),
            ScriptKind::JMeter => self.work_dir.join("test.jmx"),
        }
    }

    /// Prefix passed to `locust --csv`.
    pub fn csv_prefix(&self) -> PathBuf {
        self.work_dir.join("report")
    }

    /// Locust single-page HTML report.
    pub fn html_report_path(&self) -> PathBuf {
        self.work_dir.join("report.html")
    }

    /// JMeter HTML dashboard directory.
    pub fn html_dir(&self) -> PathBuf {
        self.work_dir.join("html-report")
    }

    /// JMeter sample log.
    pub fn results_path(&self) -> PathBuf {
        self.work_dir.join("results.jtl")
    }

    /// Artifacts to look for once the engine exits, in report order.
    pub fn artifacts(&self) -> Vec<Artifact> {
        match self.kind {
            ScriptKind::Locust => vec![
                Artifact {
                    path: self.html_report_path(),
                    label: "report.html",
                    report_type: ReportType::Html,
                },
                Artifact {
                    path: self.work_dir.join("report_stats.csv"),
                    label: "report_stats.csv",
                    report_type: ReportType::Csv,
                },
            ],
            ScriptKind::JMeter => vec![
                Artifact {
                    path: self.html_dir().join("index.html"),
                    label: "jmeter-report.html",
                    report_type: ReportType::Html,
                },
                Artifact {
                    path: self.results_path(),
                    label: "results.jtl",
                    report_type: ReportType::Jtl,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locust_layout() {
        let layout = ArtifactLayout::new(ScriptKind::Locust, PathBuf::from("/r/task_1"));

        assert_eq!(layout.script_path(), PathBuf::from("/r/task_1/locustfile.py"));
        let artifacts = layout.artifacts();
        assert_eq!(artifacts.len(), 2);
        assert_eq!(artifacts[0].report_type, ReportType::Html);
        assert_eq!(artifacts[1].path, PathBuf::from("/r/task_1/report_stats.csv"));
    }

    #[test]
    fn test_jmeter_layout() {
        let layout = ArtifactLayout::new(ScriptKind::JMeter, PathBuf::from("/r/task_2"));

        assert_eq!(layout.script_path(), PathBuf::from("/r/task_2/test.jmx"));
        let artifacts = layout.artifacts();
        assert_eq!(
            artifacts[0].path,
            PathBuf::from("/r/task_2/html-report/index.html")
        );
        assert_eq!(artifacts[1].label, "results.jtl");
        assert_eq!(artifacts[1].report_type, ReportType::Jtl);
    }
}
