//! Settings models for `.bench-hub/config.toml`.
//!
//! This module defines the on-disk configuration shape that controls where
//! load tests run and where their artifacts end up.

use serde::Deserialize;
use serde::Serialize;
use ts_rs::TS;

/// Default reports root, relative to the working directory.
pub const DEFAULT_REPORTS_DIR: &str = "reports";

/// Default locust executable name, resolved through `PATH`.
pub const DEFAULT_LOCUST_BIN: &str = "locust";

/// Default JMeter executable name, resolved through `PATH`.
pub const DEFAULT_JMETER_BIN: &str = "jmeter";

/// Host used when neither the run nor the task names one.
pub const DEFAULT_TARGET_HOST: &str = "http://localhost:8080";

/// Extra seconds granted to a delegated run on top of its duration.
pub const DEFAULT_REMOTE_TIMEOUT_MARGIN_SECS: u64 = 30;

/// Timeout for stop requests forwarded to a remote runner.
pub const DEFAULT_STOP_TIMEOUT_SECS: u64 = 10;

/// Represents settings from `.bench-hub/config.toml`.
///
/// Every field is optional in the file; missing fields take the defaults
/// above.
///
/// # Example
///
/// ```toml
/// # .bench-hub/config.toml
/// reports_dir = "/var/lib/bench-hub/reports"
/// locust_bin = "/opt/locust/bin/locust"
/// default_host = "https://staging.example.com"
/// runner_url = "http://runner.internal:8081"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(default)]
pub struct BenchConfig {
    /// Root directory that holds one working directory per execution.
    pub reports_dir: String,

    /// Executable used for locust-style scripts.
    pub locust_bin: String,

    /// Executable used for JMeter test plans.
    pub jmeter_bin: String,

    /// Fallback target host.
    pub default_host: String,

    /// Base URL of a remote runner.
    ///
    /// When set, every execution is delegated to that runner instead of
    /// spawning a local process.
    pub runner_url: Option<String>,

    /// Seconds added to a task's duration to form the remote run timeout.
    pub remote_timeout_margin_secs: u64,

    /// Timeout for remote stop requests.
    pub stop_timeout_secs: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            reports_dir: DEFAULT_REPORTS_DIR.to_string(),
            locust_bin: DEFAULT_LOCUST_BIN.to_string(),
            jmeter_bin: DEFAULT_JMETER_BIN.to_string(),
            default_host: DEFAULT_TARGET_HOST.to_string(),
            runner_url: None,
            remote_timeout_margin_secs: DEFAULT_REMOTE_TIMEOUT_MARGIN_SECS,
            stop_timeout_secs: DEFAULT_STOP_TIMEOUT_SECS,
        }
    }
}

impl BenchConfig {
    /// The configured runner URL, if it is non-blank.
    pub fn runner_url(&self) -> Option<&str> {
        self.runner_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
