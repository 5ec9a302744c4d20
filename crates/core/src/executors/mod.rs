//! Execution-mode dispatch.
//!
//! The orchestrator talks to a single [`Executor`], chosen once from
//! configuration: either the local engine or a remote runner.

pub mod base;
pub mod factory;
pub mod local;
pub mod mock;
pub mod remote;

pub use base::{ExecutionMode, ExecutionResult, Executor, ExecutorError};
pub use factory::build_executor;
pub use local::LocalExecutor;
pub use mock::MockExecutor;
pub use remote::RemoteExecutor;
