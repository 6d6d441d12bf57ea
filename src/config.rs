//! Application configuration
//!
//! Settings come from a YAML file, `~/.codemaster/config.yml` unless
//! `--config` names another. Every key is optional and a missing file means
//! all defaults:
//!
//! ```yaml
//! runner:
//!   timeout_ms: 2000
//!   max_steps: 5000000
//!   max_call_depth: 200
//!   max_output_lines: 1000
//! dashboard:
//!   analysis_delay_ms: 2000
//!   start_tab: editor
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::dashboard::analysis::DEFAULT_ANALYSIS_DELAY;
use crate::dashboard::Tab;
use crate::error::{Error, Result};
use crate::runner::limits::Limits;

/// Default path for the config file
const DEFAULT_CONFIG_PATH: &str = "~/.codemaster/config.yml";

/// Resolves the config file path, expanding `~`
pub fn get_config_path(config_path_arg: &Option<String>) -> String {
    let config_path = match config_path_arg {
        Some(path) => path,
        None => DEFAULT_CONFIG_PATH,
    };

    shellexpand::tilde(config_path).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub timeout_ms: u64,
    pub max_steps: u64,
    pub max_call_depth: usize,
    pub max_output_lines: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        let limits = Limits::default();
        RunnerConfig {
            timeout_ms: limits.timeout.as_millis() as u64,
            max_steps: limits.max_steps,
            max_call_depth: limits.max_call_depth,
            max_output_lines: limits.max_output_lines,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub analysis_delay_ms: u64,
    pub start_tab: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            analysis_delay_ms: DEFAULT_ANALYSIS_DELAY.as_millis() as u64,
            start_tab: Tab::Editor.key().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub runner: RunnerConfig,
    pub dashboard: DashboardConfig,
}

impl AppConfig {
    /// Load the config at `path`; a missing file yields the defaults
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            debug!("no config file at {}, using defaults", path);
            return Ok(AppConfig::default());
        }

        let file = File::open(path).map_err(|e| Error::io_error("config", path, e))?;
        let reader = BufReader::new(file);
        let config: AppConfig = serde_yaml::from_reader(reader)
            .map_err(|e| Error::yaml_error("parsing", "config", path, e))?;
        info!("loaded config from {}", path);
        Ok(config)
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, timeout_ms: Option<u64>, max_steps: Option<u64>) -> Self {
        if let Some(timeout_ms) = timeout_ms {
            self.runner.timeout_ms = timeout_ms;
        }
        if let Some(max_steps) = max_steps {
            self.runner.max_steps = max_steps;
        }
        self
    }

    /// Limits for each run; zero budgets are rejected
    pub fn limits(&self) -> Result<Limits> {
        let runner = &self.runner;
        if runner.timeout_ms == 0 {
            return Err(Error::InvalidLimit("timeout_ms must be positive".to_string()));
        }
        if runner.max_steps == 0 {
            return Err(Error::InvalidLimit("max_steps must be positive".to_string()));
        }
        if runner.max_call_depth == 0 {
            return Err(Error::InvalidLimit("max_call_depth must be positive".to_string()));
        }
        Ok(Limits::default()
            .with_timeout(Duration::from_millis(runner.timeout_ms))
            .with_max_steps(runner.max_steps)
            .with_max_call_depth(runner.max_call_depth)
            .with_max_output_lines(runner.max_output_lines))
    }

    pub fn start_tab(&self) -> Result<Tab> {
        Tab::from_key(&self.dashboard.start_tab)
            .ok_or_else(|| Error::UnknownTab(self.dashboard.start_tab.clone()))
    }

    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.dashboard.analysis_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_custom_config_path_is_kept() {
        assert_eq!(
            get_config_path(&Some("/etc/codemaster.yml".to_string())),
            "/etc/codemaster.yml"
        );
        assert!(get_config_path(&None).ends_with(".codemaster/config.yml"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = AppConfig::load("/definitely/not/here/config.yml").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.limits().unwrap(), Limits::default());
        assert_eq!(config.start_tab().unwrap(), Tab::Editor);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "runner:\n  timeout_ms: 750\ndashboard:\n  start_tab: exercises").unwrap();

        let config = AppConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.runner.timeout_ms, 750);
        assert_eq!(config.runner.max_steps, Limits::default().max_steps);
        assert_eq!(config.start_tab().unwrap(), Tab::Exercises);
        assert_eq!(config.analysis_delay(), DEFAULT_ANALYSIS_DELAY);
    }

    #[test]
    fn test_malformed_file_is_yaml_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "runner: [1, 2").unwrap();
        let err = AppConfig::load(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, Error::Yaml { .. }));
    }

    #[test]
    fn test_overrides_and_validation() {
        let config = AppConfig::default().with_overrides(Some(100), Some(42));
        let limits = config.limits().unwrap();
        assert_eq!(limits.timeout_ms(), 100);
        assert_eq!(limits.max_steps, 42);

        let zero = AppConfig::default().with_overrides(None, Some(0));
        assert!(matches!(zero.limits(), Err(Error::InvalidLimit(_))));
    }

    #[test]
    fn test_unknown_start_tab() {
        let mut config = AppConfig::default();
        config.dashboard.start_tab = "home".to_string();
        assert!(matches!(config.start_tab(), Err(Error::UnknownTab(_))));
    }
}
