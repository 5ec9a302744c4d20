//! # bh-core
//!
//! Task execution orchestrator for bench-hub.
//!
//! This crate provides:
//! - Configuration loading from the `.bench-hub/` directory
//! - A process registry that makes running executions stoppable
//! - The local execution engine for locust and JMeter scripts
//! - Results classification for JMeter `.jtl` files
//! - A client for delegating executions to a remote runner
//! - The orchestrator owning task status transitions
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading and management
//! - [`state`]: Process registry and task state transitions
//! - [`target`]: Target host resolution
//! - [`classifier`]: Results file classification
//! - [`engine`]: Local execution engine
//! - [`remote`]: Remote runner HTTP client
//! - [`executors`]: Executor trait with local and remote implementations
//! - [`store`]: Storage interfaces consumed by the orchestrator
//! - [`orchestrator`]: Run/stop entry points

pub mod classifier;
pub mod config;
pub mod engine;
pub mod executors;
pub mod orchestrator;
pub mod remote;
pub mod state;
pub mod store;
pub mod target;
