//! Integration tests for the Orchestrator with the local executor.

#![cfg(unix)]

mod common;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bh_core::executors::LocalExecutor;
use bh_core::orchestrator::Orchestrator;
use bh_core::state::registry::ProcessRegistry;
use bh_core::store::{MemoryStore, TaskStore};
use bh_protocol::report_models::ReportType;
use bh_protocol::script_models::ScriptKind;
use bh_protocol::task_models::TaskStatus;
use common::*;
use tempfile::TempDir;

async fn create_orchestrator(
    locust_sleep: u32,
) -> (TempDir, Orchestrator, Arc<MemoryStore>, Arc<ProcessRegistry>) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let locust = fake_locust(dir.path(), 0, locust_sleep);
    create_orchestrator_with(dir, locust).await
}

async fn create_orchestrator_with(
    dir: TempDir,
    locust: PathBuf,
) -> (TempDir, Orchestrator, Arc<MemoryStore>, Arc<ProcessRegistry>) {
    let jmeter = fake_jmeter(dir.path(), JTL_ALL_PASSED, 0);
    let config = create_test_engine_config(&dir.path().join("reports"), &locust, &jmeter);

    let registry = Arc::new(ProcessRegistry::new());
    let store = Arc::new(MemoryStore::new());
    store.insert_script(create_test_script("s1", ScriptKind::Locust)).await;
    store.insert_task(create_test_task("t1", "s1")).await;

    let orchestrator = Orchestrator::new(
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(LocalExecutor::new(config, Arc::clone(&registry))),
    );
    (dir, orchestrator, store, registry)
}

#[tokio::test]
async fn test_local_run_to_completion() {
    let (_dir, orchestrator, store, registry) = create_orchestrator(0).await;

    let (task, handle) = orchestrator.run_with_handle("t1", None).await.unwrap();
    assert_eq!(task.status, TaskStatus::Running);

    let finished = tokio::time::timeout(Duration::from_secs(10), handle.unwrap())
        .await
        .expect("Execution should finish")
        .unwrap();
    assert_eq!(finished.status, TaskStatus::Finished);
    assert!(finished.finished_at.is_some());

    let reports = store.reports_for_task("t1").await;
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().any(|r| r.report_type == ReportType::Html));
    assert!(reports.iter().any(|r| r.report_type == ReportType::Csv));
    assert!(reports.iter().all(|r| r.task_name.as_deref() == Some("t1-name")));
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_local_stop_while_running() {
    let (_dir, orchestrator, store, registry) = create_orchestrator(30).await;

    let (_, handle) = orchestrator.run_with_handle("t1", None).await.unwrap();
    wait_until_spawned(&registry, "t1").await;

    let stopped = orchestrator.stop("t1").await.unwrap();
    assert_eq!(stopped.status, TaskStatus::Stopped);

    let final_task = tokio::time::timeout(Duration::from_secs(10), handle.unwrap())
        .await
        .expect("Execution should end after stop")
        .unwrap();
    assert_eq!(final_task.status, TaskStatus::Stopped);
    assert_eq!(
        TaskStore::get(store.as_ref(), "t1").await.unwrap().status,
        TaskStatus::Stopped
    );
}

#[tokio::test]
async fn test_stop_after_completion_keeps_outcome() {
    let (_dir, orchestrator, _store, _registry) = create_orchestrator(0).await;

    let (_, handle) = orchestrator.run_with_handle("t1", None).await.unwrap();
    handle.unwrap().await.unwrap();

    let task = orchestrator.stop("t1").await.unwrap();
    assert_eq!(task.status, TaskStatus::Finished);
}

#[tokio::test]
async fn test_rerun_right_after_stop_waits_for_first_execution() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let locust = fake_slow_stopping_locust(dir.path(), 1);
    let (_dir, orchestrator, store, registry) = create_orchestrator_with(dir, locust).await;

    let (_, first) = orchestrator.run_with_handle("t1", None).await.unwrap();
    wait_until_spawned(&registry, "t1").await;
    let first_pid = registry.pid_of("t1");

    let stopped = orchestrator.stop("t1").await.unwrap();
    assert_eq!(stopped.status, TaskStatus::Stopped);

    // The first process is still shutting down.
    let (task, second) = orchestrator.run_with_handle("t1", None).await.unwrap();
    assert!(second.is_none());
    assert_eq!(task.status, TaskStatus::Stopped);
    assert_eq!(registry.pid_of("t1"), first_pid);

    let ended = tokio::time::timeout(Duration::from_secs(10), first.unwrap())
        .await
        .expect("First execution should end after stop")
        .unwrap();
    assert_eq!(ended.status, TaskStatus::Stopped);
    assert!(registry.is_empty());
    assert_eq!(
        TaskStore::get(store.as_ref(), "t1").await.unwrap().status,
        TaskStatus::Stopped
    );

    // A fresh run is tracked and can be stopped in turn.
    let (task, second) = orchestrator.run_with_handle("t1", None).await.unwrap();
    assert_eq!(task.status, TaskStatus::Running);
    wait_until_spawned(&registry, "t1").await;
    assert_eq!(
        TaskStore::get(store.as_ref(), "t1").await.unwrap().status,
        TaskStatus::Running
    );

    let stopped = orchestrator.stop("t1").await.unwrap();
    assert_eq!(stopped.status, TaskStatus::Stopped);
    let ended = tokio::time::timeout(Duration::from_secs(10), second.unwrap())
        .await
        .expect("Second execution should end after stop")
        .unwrap();
    assert_eq!(ended.status, TaskStatus::Stopped);
    assert!(registry.is_empty());
    assert_eq!(store.reports_for_task("t1").await.len(), 4);
}
