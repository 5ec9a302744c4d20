//! In-memory store used by the CLI and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use bh_protocol::report_models::Report;
use bh_protocol::script_models::Script;
use bh_protocol::task_models::Task;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::store::{ReportStore, ScriptStore, StoreError, StoreResult, TaskStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: Mutex<HashMap<String, Task>>,
    scripts: Mutex<HashMap<String, Script>>,
    reports: Mutex<Vec<Report>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_task(&self, task: Task) {
        self.tasks.lock().await.insert(task.id.clone(), task);
    }

    pub async fn insert_script(&self, script: Script) {
        self.scripts.lock().await.insert(script.id.clone(), script);
    }

    /// Reports created for `task_id`, in creation order.
    pub async fn reports_for_task(&self, task_id: &str) -> Vec<Report> {
        self.reports
            .lock()
            .await
            .iter()
            .filter(|r| r.task_id.as_deref() == Some(task_id))
            .cloned()
            .collect()
    }

    pub async fn list_reports(&self) -> Vec<Report> {
        self.reports.lock().await.clone()
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn get(&self, id: &str) -> StoreResult<Task> {
        self.tasks
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "task",
                id: id.to_string(),
            })
    }

    async fn update(&self, task: &Task) -> StoreResult<()> {
        let mut tasks = self.tasks.lock().await;
        let stored = tasks.get_mut(&task.id).ok_or_else(|| StoreError::NotFound {
            entity: "task",
            id: task.id.clone(),
        })?;
        *stored = task.clone();
        stored.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl ScriptStore for MemoryStore {
    async fn get(&self, id: &str) -> StoreResult<Script> {
        self.scripts
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "script",
                id: id.to_string(),
            })
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn create(&self, report: &Report) -> StoreResult<()> {
        self.reports.lock().await.push(report.clone());
        Ok(())
    }
}
