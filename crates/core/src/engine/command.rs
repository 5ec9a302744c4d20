//! Engine command lines.

use tokio::process::Command;

use bh_protocol::script_models::ScriptKind;

use crate::config::models::EngineConfig;
use crate::engine::layout::ArtifactLayout;
use crate::engine::ExecutionSpec;
use crate::target::{effective_host, parse_target_host};

/// A program and its arguments, kept separate from `tokio::process::Command`
/// so it can be inspected and logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl EngineCommand {
    /// Build the command line for `spec`, writing artifacts into `layout`.
    pub fn build(spec: &ExecutionSpec, layout: &ArtifactLayout, config: &EngineConfig) -> Self {
        let host = effective_host(&spec.target_host, &config.default_host);
        match spec.kind {
            ScriptKind::Locust => Self::locust(spec, layout, &config.locust_bin, host),
            ScriptKind::JMeter => Self::jmeter(spec, layout, &config.jmeter_bin, host),
        }
    }

    fn locust(spec: &ExecutionSpec, layout: &ArtifactLayout, program: &str, host: &str) -> Self {
        let args = vec![
            "-f".to_string(),
            path_arg(&layout.script_path()),
            "--headless".to_string(),
            "-u".to_string(),
            spec.users_count.to_string(),
            "-r".to_string(),
            spec.spawn_rate.to_string(),
            "--run-time".to_string(),
            format!("{}s", spec.duration_seconds),
            "--host".to_string(),
            host.to_string(),
            "--csv".to_string(),
            path_arg(&layout.csv_prefix()),
            "--html".to_string(),
            path_arg(&layout.html_report_path()),
        ];
        Self {
            program: program.to_string(),
            args,
        }
    }

    fn jmeter(spec: &ExecutionSpec, layout: &ArtifactLayout, program: &str, host: &str) -> Self {
        let target = parse_target_host(host, host);
        let mut args = vec![
            "-n".to_string(),
            "-t".to_string(),
            path_arg(&layout.script_path()),
            "-l".to_string(),
            path_arg(&layout.results_path()),
            "-e".to_string(),
            "-o".to_string(),
            path_arg(&layout.html_dir()),
            format!("-Jtarget_host={}", target.host),
            format!("-Jtarget_port={}", target.port),
            format!("-Jtarget_protocol={}", target.protocol),
            format!("-Jduration={}", spec.duration_seconds),
        ];
        if let Some(tpm) = spec.jmeter_tpm.filter(|tpm| *tpm > 0) {
            args.push(format!("-Jtpm={tpm}"));
        }
        Self {
            program: program.to_string(),
            args,
        }
    }

    /// Human-readable command line for logs.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

fn path_arg(path: &std::path::Path) -> String {
    path.to_string_lossy().into_owned()
}
