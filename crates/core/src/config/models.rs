//! Configuration models derived from the loaded settings.
//!
//! [`AppConfig`] wraps the raw [`BenchConfig`] and hands out the narrower
//! views the engine and executors are built from.

use std::path::PathBuf;
use std::time::Duration;

use bh_protocol::config_models::BenchConfig;

use crate::executors::base::ExecutionMode;

/// Unified application configuration.
///
/// # Example
///
/// ```rust,no_run
/// use bh_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Reports go to {}", config.engine().reports_dir.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Settings after file and environment layering.
    pub settings: BenchConfig,

    /// The config file the settings were read from, if any.
    pub source: Option<PathBuf>,
}

/// Settings needed to run executions on this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub reports_dir: PathBuf,
    pub locust_bin: String,
    pub jmeter_bin: String,
    pub default_host: String,
}

impl From<&BenchConfig> for EngineConfig {
    fn from(settings: &BenchConfig) -> Self {
        Self {
            reports_dir: PathBuf::from(&settings.reports_dir),
            locust_bin: settings.locust_bin.clone(),
            jmeter_bin: settings.jmeter_bin.clone(),
            default_host: settings.default_host.clone(),
        }
    }
}

/// Settings needed to talk to a remote runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub base_url: String,
    pub timeout_margin: Duration,
    pub stop_timeout: Duration,
}

impl AppConfig {
    pub fn new(settings: BenchConfig) -> Self {
        Self {
            settings,
            source: None,
        }
    }

    pub fn engine(&self) -> EngineConfig {
        EngineConfig::from(&self.settings)
    }

    /// Remote settings, present only when a runner URL is configured.
    pub fn remote(&self) -> Option<RemoteConfig> {
        self.settings.runner_url().map(|url| RemoteConfig {
            base_url: url.to_string(),
            timeout_margin: Duration::from_secs(self.settings.remote_timeout_margin_secs),
            stop_timeout: Duration::from_secs(self.settings.stop_timeout_secs),
        })
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        if self.settings.runner_url().is_some() {
            ExecutionMode::Remote
        } else {
            ExecutionMode::Local
        }
    }
}
