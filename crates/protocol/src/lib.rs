//! # bh-protocol
//!
//! Core data models and wire protocol for bench-hub.
//!
//! This crate defines all shared data structures used for:
//! - Load-testing tasks, scripts and their generated reports
//! - Runtime status tracking of task executions
//! - The HTTP contract between the orchestrator and a remote runner
//!
//! ## Modules
//!
//! - [`config_models`]: Settings from `.bench-hub/config.toml`
//! - [`script_models`]: Load-test scripts and engine kinds
//! - [`task_models`]: Tasks, their status and execution outcomes
//! - [`report_models`]: Report artifacts produced by executions
//! - [`runner`]: Request/response bodies for the remote runner
//!
//! ## Design Principles
//!
//! - Minimal dependencies: Only serde, chrono and ts-rs
//! - TypeScript generation: All types derive `TS` for the web client
//! - Independent compilation: No dependencies on other bench-hub crates

pub mod config_models;
pub mod report_models;
pub mod runner;
pub mod script_models;
pub mod task_models;

// Re-export all public types for convenience
pub use config_models::*;
pub use report_models::*;
pub use runner::*;
pub use script_models::*;
pub use task_models::*;
