use bh_core::config::error::{ConfigError, ConfigResult};
use bh_core::config::loader::apply_env_overrides;
use bh_core::config::models::EngineConfig;
use bh_protocol::config_models::BenchConfig;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8081;

/// Runner configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub host: String,
    pub port: u16,
    pub engine: EngineConfig,
}

impl RunnerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var       | Default                 |
    /// |---------------|-------------------------|
    /// | `RUNNER_HOST` | `0.0.0.0`               |
    /// | `RUNNER_PORT` | `8081`                  |
    /// | `REPORTS_DIR` | `reports`               |
    /// | `LOCUST_BIN`  | `locust`                |
    /// | `JMETER_BIN`  | `jmeter`                |
    /// | `LOCUST_HOST` | `http://localhost:8080` |
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(env: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let host = lookup("RUNNER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("RUNNER_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidConfig {
                origin: "RUNNER_PORT".to_string(),
                reason: format!("'{raw}' is not a valid port"),
            })?,
            None => DEFAULT_PORT,
        };

        let mut settings = BenchConfig::default();
        apply_env_overrides(&mut settings, &env);

        Ok(Self {
            host,
            port,
            engine: EngineConfig::from(&settings),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
