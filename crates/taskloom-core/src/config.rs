//! Scheduler configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes. Without a file the built-in roster and timings are used.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app::PrioritizerConfig;
use crate::domain::WorkerProfile;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("parsing config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value for `{key}`: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Simulated execution timing and failure odds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    pub min_units: u32,
    pub max_units: u32,
    /// Length of one time unit in milliseconds.
    pub unit_ms: u64,
    /// Probability in [0, 1] that one execution fails.
    pub failure_rate: f64,
}

impl ExecutionConfig {
    pub fn unit(&self) -> Duration {
        Duration::from_millis(self.unit_ms)
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            min_units: 1,
            max_units: 5,
            unit_ms: 1000,
            failure_rate: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Pause between orchestration cycles, in milliseconds.
    pub cycle_interval_ms: u64,
    pub execution: ExecutionConfig,
    pub prioritizer: PrioritizerConfig,
    pub state_path: PathBuf,
    pub graph_path: PathBuf,
    pub render_graph_each_cycle: bool,
    pub workers: Vec<WorkerProfile>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            cycle_interval_ms: 5000,
            execution: ExecutionConfig::default(),
            prioritizer: PrioritizerConfig::default(),
            state_path: PathBuf::from("task_manager_state.json"),
            graph_path: PathBuf::from("task_dependencies.dot"),
            render_graph_each_cycle: true,
            workers: default_roster(),
        }
    }
}

impl SchedulerConfig {
    /// Read a JSON config file and validate it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn cycle_interval(&self) -> Duration {
        Duration::from_millis(self.cycle_interval_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cycle_interval_ms == 0 {
            return Err(invalid("cycle_interval_ms", "must be greater than zero"));
        }
        let exec = &self.execution;
        if exec.min_units > exec.max_units {
            return Err(invalid(
                "execution.min_units",
                format!("{} is greater than max_units {}", exec.min_units, exec.max_units),
            ));
        }
        if !(0.0..=1.0).contains(&exec.failure_rate) {
            return Err(invalid(
                "execution.failure_rate",
                format!("{} is outside [0, 1]", exec.failure_rate),
            ));
        }
        if self.workers.is_empty() {
            return Err(invalid("workers", "at least one worker is required"));
        }
        Ok(())
    }
}

fn invalid(key: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        message: message.into(),
    }
}

/// Jexi, Nova, Astra and Sung.
pub fn default_roster() -> Vec<WorkerProfile> {
    vec![
        WorkerProfile::new(
            "Jexi",
            "Data Analyst",
            ["analyze data", "predictive analysis", "data cleaning", "generate reports"],
        ),
        WorkerProfile::new(
            "Nova",
            "Task Executor",
            [
                "cross-platform execution",
                "automation",
                "trigger-based automation",
                "automated testing",
            ],
        ),
        WorkerProfile::new(
            "Astra",
            "Research & Customer Support",
            ["market research", "customer support", "content curation", "trend analysis"],
        ),
        WorkerProfile::new(
            "Sung",
            "Project Coordinator",
            ["task management", "code execution", "code review", "documentation"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults_are_valid() {
        let config = SchedulerConfig::default();
        config.validate().unwrap();
        assert_eq!(config.cycle_interval(), Duration::from_secs(5));
        assert_eq!(config.workers.len(), 4);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taskloom.json");
        std::fs::write(
            &path,
            r#"{ "cycle_interval_ms": 250, "execution": { "failure_rate": 0.0 } }"#,
        )
        .unwrap();

        let config = SchedulerConfig::from_path(&path).unwrap();
        assert_eq!(config.cycle_interval_ms, 250);
        assert_eq!(config.execution.failure_rate, 0.0);
        assert_eq!(config.execution.max_units, 5);
        assert_eq!(config.prioritizer, PrioritizerConfig::default());
        assert_eq!(config.workers, default_roster());
    }

    #[test]
    fn roster_can_be_replaced() {
        let json = r#"{ "workers": [ { "name": "Solo", "capabilities": ["anything"] } ] }"#;
        let config: SchedulerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.workers.len(), 1);
        assert_eq!(config.workers[0].role, "");
    }

    #[rstest]
    #[case::inverted_units(r#"{ "execution": { "min_units": 6, "max_units": 2 } }"#, "execution.min_units")]
    #[case::bad_rate(r#"{ "execution": { "failure_rate": 1.5 } }"#, "execution.failure_rate")]
    #[case::no_workers(r#"{ "workers": [] }"#, "workers")]
    #[case::zero_interval(r#"{ "cycle_interval_ms": 0 }"#, "cycle_interval_ms")]
    fn invalid_values_are_rejected(#[case] json: &str, #[case] expected_key: &str) {
        let config: SchedulerConfig = serde_json::from_str(json).unwrap();
        match config.validate() {
            Err(ConfigError::Invalid { key, .. }) => assert_eq!(key, expected_key),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SchedulerConfig::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
