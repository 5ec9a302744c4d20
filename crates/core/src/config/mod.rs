//! Configuration loading and management.
//!
//! This module loads `.bench-hub/config.toml`, applies environment
//! overrides and derives the settings each component needs.

pub mod error;
pub mod loader;
pub mod models;
