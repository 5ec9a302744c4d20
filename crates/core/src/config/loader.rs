//! Configuration loader for the `.bench-hub/` directory.
//!
//! Settings are layered:
//! 1. Built-in defaults
//! 2. `.bench-hub/config.toml`, when present
//! 3. Environment variables (`REPORTS_DIR`, `LOCUST_BIN`, `JMETER_BIN`,
//!    `LOCUST_HOST`, `RUNNER_URL`)

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::AppConfig;
use bh_protocol::config_models::BenchConfig;
use std::path::Path;

/// Directory holding bench-hub configuration, relative to the root.
pub const CONFIG_DIR: &str = ".bench-hub";

/// File name of the settings file inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

/// Loads configuration from `<root>/.bench-hub/config.toml` and the
/// process environment.
///
/// # Arguments
///
/// * `root` - Root directory containing the `.bench-hub/` folder
///
/// # Returns
///
/// An `AppConfig` with all layers applied. A missing directory or file is
/// not an error; defaults are used instead.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - The file exists but cannot be read
/// - The file is not valid TOML for [`BenchConfig`]
/// - The runner URL is not a valid absolute URL
pub async fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    load_config_with_env(root, |key| std::env::var(key).ok()).await
}

/// Same as [`load_config`] with an explicit environment lookup.
pub async fn load_config_with_env<F>(root: &Path, env: F) -> ConfigResult<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let config_path = root.join(CONFIG_DIR).join(CONFIG_FILE);

    let (mut settings, source) = if config_path.exists() {
        let content = tokio::fs::read_to_string(&config_path)
            .await
            .map_err(|source| ConfigError::FileRead {
                path: config_path.clone(),
                source,
            })?;

        let settings: BenchConfig =
            toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
                path: config_path.clone(),
                source,
            })?;

        (settings, Some(config_path))
    } else {
        (BenchConfig::default(), None)
    };

    apply_env_overrides(&mut settings, env);
    validate(&settings)?;

    tracing::debug!(
        source = ?source,
        reports_dir = %settings.reports_dir,
        runner_url = ?settings.runner_url(),
        "Loaded bench-hub configuration"
    );

    Ok(AppConfig { settings, source })
}

/// Overlay non-empty environment values onto the settings.
pub fn apply_env_overrides<F>(settings: &mut BenchConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| env(key).filter(|value| !value.trim().is_empty());

    if let Some(value) = lookup("REPORTS_DIR") {
        settings.reports_dir = value;
    }
    if let Some(value) = lookup("LOCUST_BIN") {
        settings.locust_bin = value;
    }
    if let Some(value) = lookup("JMETER_BIN") {
        settings.jmeter_bin = value;
    }
    if let Some(value) = lookup("LOCUST_HOST") {
        settings.default_host = value;
    }
    if let Some(value) = lookup("RUNNER_URL") {
        settings.runner_url = Some(value);
    }
}

fn validate(settings: &BenchConfig) -> ConfigResult<()> {
    if settings.reports_dir.trim().is_empty() {
        return Err(ConfigError::InvalidConfig {
            origin: "reports_dir".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    if let Some(url) = settings.runner_url() {
        url::Url::parse(url).map_err(|e| ConfigError::InvalidConfig {
            origin: "runner_url".to_string(),
            reason: format!("'{url}' is not a valid URL: {e}"),
        })?;
    }

    Ok(())
}
