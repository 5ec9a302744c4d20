//! Shared helpers for integration tests.
//!
//! - Fake engine binaries standing in for locust and jmeter
//! - Sample tasks, scripts and engine configs
//! - Polling helpers for asynchronous state

pub mod fixtures;

pub use fixtures::*;
