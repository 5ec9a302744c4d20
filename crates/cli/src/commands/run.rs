//! `bench run`: one task through the orchestrator.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use bh_core::config::loader::load_config;
use bh_core::config::models::AppConfig;
use bh_core::executors::{build_executor, ExecutionMode};
use bh_core::orchestrator::Orchestrator;
use bh_core::state::registry::ProcessRegistry;
use bh_core::store::MemoryStore;
use bh_protocol::report_models::Report;
use bh_protocol::script_models::{Script, ScriptKind};
use bh_protocol::task_models::{Task, TaskStatus};
use chrono::Utc;
use color_eyre::eyre::{eyre, WrapErr};
use colored::{ColoredString, Colorize};
use uuid::Uuid;

use crate::args::RunArgs;

pub async fn execute(args: RunArgs) -> color_eyre::Result<ExitCode> {
    let mut config = load_config(&args.config_root)
        .await
        .wrap_err("Failed to load configuration")?;
    if let Some(url) = &args.runner_url {
        config.settings.runner_url = Some(url.clone());
    }
    tracing::debug!(
        source = ?config.source,
        mode = %config.execution_mode(),
        "Configuration loaded"
    );

    let content = tokio::fs::read_to_string(&args.script)
        .await
        .wrap_err_with(|| format!("Failed to read script {}", args.script.display()))?;
    let kind = args
        .kind
        .map_or_else(|| infer_kind(&args.script), ScriptKind::from);
    let name = args.name.clone().unwrap_or_else(|| file_stem(&args.script));

    let store = Arc::new(MemoryStore::new());
    let script = new_script(&name, kind, content);
    let mut task = Task::new(
        Uuid::new_v4().to_string(),
        name,
        script.id.clone(),
        args.users,
        args.spawn_rate,
        args.duration,
    );
    task.jmeter_tpm = args.tpm;
    store.insert_script(script).await;
    store.insert_task(task.clone()).await;

    let registry = Arc::new(ProcessRegistry::new());
    let executor = build_executor(&config, registry);
    let orchestrator = Orchestrator::new(store.clone(), store.clone(), store.clone(), executor);

    let (started, handle) = orchestrator
        .run_with_handle(&task.id, args.host.as_deref())
        .await
        .wrap_err("Failed to start task")?;
    let mut handle = handle.ok_or_else(|| eyre!("Task {} was already running", started.id))?;

    println!(
        "{} {} ({}, {} users, {}s, {})",
        "running".yellow().bold(),
        started.name,
        kind,
        started.users_count,
        started.duration_seconds,
        orchestrator.mode(),
    );

    let finished = tokio::select! {
        joined = &mut handle => joined.wrap_err("Execution task panicked")?,
        interrupted = tokio::signal::ctrl_c() => {
            interrupted.wrap_err("Failed to listen for Ctrl-C")?;
            println!("{}", "stopping...".yellow());
            orchestrator.stop(&started.id).await.wrap_err("Failed to stop task")?;
            handle.await.wrap_err("Execution task panicked")?
        }
    };

    let reports = store.reports_for_task(&finished.id).await;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&finished)?);
    } else {
        print_summary(&finished, &reports, &config);
    }

    Ok(if finished.status == TaskStatus::Finished {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_summary(task: &Task, reports: &[Report], config: &AppConfig) {
    println!("{} {}", status_label(task.status), task.name);
    if let (Some(started), Some(finished)) = (task.started_at, task.finished_at) {
        let elapsed = (finished - started).num_milliseconds() as f64 / 1000.0;
        println!("  elapsed: {elapsed:.1}s");
    }
    if reports.is_empty() {
        println!("  no reports");
        return;
    }
    let root = config.engine().reports_dir;
    for report in reports {
        let location = match config.execution_mode() {
            ExecutionMode::Local => root.join(&report.file_path).display().to_string(),
            ExecutionMode::Remote => format!("{} (on runner)", report.file_path),
        };
        println!("  {} {} {}", report.report_type, report.name.bold(), location);
    }
}

fn status_label(status: TaskStatus) -> ColoredString {
    let label = status.as_str();
    match status {
        TaskStatus::Finished => label.green().bold(),
        TaskStatus::Stopped => label.yellow().bold(),
        _ => label.red().bold(),
    }
}

fn infer_kind(path: &Path) -> ScriptKind {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("jmx") => ScriptKind::JMeter,
        _ => ScriptKind::Locust,
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "task".to_string())
}

fn new_script(name: &str, kind: ScriptKind, content: String) -> Script {
    let now = Utc::now();
    Script {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        description: String::new(),
        kind,
        content,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_kind() {
        assert_eq!(infer_kind(Path::new("plan.JMX")), ScriptKind::JMeter);
        assert_eq!(infer_kind(Path::new("locustfile.py")), ScriptKind::Locust);
        assert_eq!(infer_kind(Path::new("script")), ScriptKind::Locust);
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem(Path::new("/tmp/checkout.py")), "checkout");
    }
}
