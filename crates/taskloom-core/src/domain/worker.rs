//! Worker profile and performance history.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::WorkerName;

/// Static description of a worker, as read from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerProfile {
    pub name: WorkerName,

    /// Informational only; never used for matching.
    #[serde(default)]
    pub role: String,

    pub capabilities: Vec<String>,
}

impl WorkerProfile {
    pub fn new<I, S>(name: impl Into<String>, role: impl Into<String>, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: WorkerName::new(name),
            role: role.into(),
            capabilities: capabilities.into_iter().map(Into::into).collect(),
        }
    }
}

/// One finished task handling, success or failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceEntry {
    pub description: String,
    pub elapsed: Duration,
}

/// Aggregate over a worker's performance record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub handled: usize,
    pub total: Duration,
}

impl PerformanceSummary {
    pub fn from_entries(entries: &[PerformanceEntry]) -> Self {
        Self {
            handled: entries.len(),
            total: entries.iter().map(|e| e.elapsed).sum(),
        }
    }

    pub fn mean(&self) -> Option<Duration> {
        u32::try_from(self.handled)
            .ok()
            .filter(|n| *n > 0)
            .map(|n| self.total / n)
    }
}
