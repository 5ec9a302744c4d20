//! State management for task executions.
//!
//! This module provides:
//! - Task status transition logic
//! - ProcessRegistry for stopping in-flight local processes

pub mod registry;
pub mod task;
