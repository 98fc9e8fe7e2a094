//! Configuration handling for the form

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_SUBMIT_DELAY_MS: u64 = 2000;
const DEFAULT_LOG_FILTER: &str = "distributor_form=info";
const DEFAULT_NOTIFICATION_LIMIT: usize = 20;

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Simulated transmission delay in milliseconds
    pub submit_delay_ms: Option<u64>,
    /// Make the simulated transmitter fail every submission
    pub simulate_failure: Option<bool>,
    /// tracing filter directive used when RUST_LOG is unset
    pub log_filter: Option<String>,
    /// Number of notifications kept for the status bar
    pub notification_limit: Option<usize>,
}

impl AppConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("io", "distributor", "distributor-form")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Log file location, inside the platform data directory
    pub fn log_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().join("distributor-form.log"))
    }

    /// Load configuration from file, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                let content = fs::read_to_string(&path)?;
                serde_json::from_str(&content)?
            }
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override fields from `DISTRIBUTOR_FORM_*` variables. Unparseable
    /// values are logged and ignored.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup("DISTRIBUTOR_FORM_SUBMIT_DELAY_MS") {
            match raw.trim().parse() {
                Ok(ms) => self.submit_delay_ms = Some(ms),
                Err(_) => tracing::warn!("ignoring DISTRIBUTOR_FORM_SUBMIT_DELAY_MS={raw:?}"),
            }
        }
        if let Some(raw) = lookup("DISTRIBUTOR_FORM_SIMULATE_FAILURE") {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => self.simulate_failure = Some(true),
                "0" | "false" | "no" => self.simulate_failure = Some(false),
                _ => tracing::warn!("ignoring DISTRIBUTOR_FORM_SIMULATE_FAILURE={raw:?}"),
            }
        }
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms.unwrap_or(DEFAULT_SUBMIT_DELAY_MS))
    }

    pub fn simulate_failure(&self) -> bool {
        self.simulate_failure.unwrap_or(false)
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    pub fn notification_limit(&self) -> usize {
        self.notification_limit
            .unwrap_or(DEFAULT_NOTIFICATION_LIMIT)
    }
}
