//! Storage interfaces the orchestrator depends on.
//!
//! Persistence itself lives outside this crate; only the narrow operations
//! the orchestrator needs are modelled, plus an in-memory implementation.

pub mod memory;

use async_trait::async_trait;
use bh_protocol::report_models::Report;
use bh_protocol::script_models::Script;
use bh_protocol::task_models::Task;
use thiserror::Error;

pub use memory::MemoryStore;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Storage backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn get(&self, id: &str) -> StoreResult<Task>;

    /// Persist the full task record.
    async fn update(&self, task: &Task) -> StoreResult<()>;
}

#[async_trait]
pub trait ScriptStore: Send + Sync {
    async fn get(&self, id: &str) -> StoreResult<Script>;
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn create(&self, report: &Report) -> StoreResult<()>;
}
