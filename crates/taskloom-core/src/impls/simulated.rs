//! Executors that stand in for real work.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use crate::config::ExecutionConfig;
use crate::domain::{ExecutionOutcome, Task, TaskId};
use crate::ports::TaskExecutor;

pub const SIMULATED_FAILURE: &str = "Simulated execution error";

/// Sleeps for a uniform random number of time units, then flips a coin.
#[derive(Debug, Clone)]
pub struct SimulatedExecutor {
    config: ExecutionConfig,
}

impl SimulatedExecutor {
    pub fn new(config: ExecutionConfig) -> Self {
        Self { config }
    }

    /// Draw this run's duration and outcome up front; `ThreadRng` is not
    /// `Send`, so it must not live across the sleep.
    fn draw(&self) -> (Duration, bool) {
        let (min, max) = (self.config.min_units, self.config.max_units);
        let mut rng = rand::thread_rng();
        let units = rng.gen_range(min.min(max)..=min.max(max));
        let fails = rng.gen_bool(self.config.failure_rate.clamp(0.0, 1.0));
        (self.config.unit() * units, fails)
    }
}

#[async_trait]
impl TaskExecutor for SimulatedExecutor {
    async fn execute(&self, _task: &Task) -> ExecutionOutcome {
        let (duration, fails) = self.draw();
        tokio::time::sleep(duration).await;
        if fails {
            ExecutionOutcome::failure(SIMULATED_FAILURE)
        } else {
            ExecutionOutcome::success()
        }
    }
}

/// Deterministic executor: fixed delay, failures chosen by task id.
/// Records the order in which tasks were executed.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    delay: Duration,
    fail_all: bool,
    failing: HashSet<TaskId>,
    executed: Mutex<Vec<TaskId>>,
}

impl ScriptedExecutor {
    pub fn succeeding(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn failing(delay: Duration) -> Self {
        Self {
            delay,
            fail_all: true,
            ..Self::default()
        }
    }

    pub fn fail_task(mut self, id: impl Into<TaskId>) -> Self {
        self.failing.insert(id.into());
        self
    }

    pub fn executed(&self) -> Vec<TaskId> {
        self.executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl TaskExecutor for ScriptedExecutor {
    async fn execute(&self, task: &Task) -> ExecutionOutcome {
        self.executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(task.id);
        tokio::time::sleep(self.delay).await;
        if self.fail_all || self.failing.contains(&task.id) {
            ExecutionOutcome::failure(SIMULATED_FAILURE)
        } else {
            ExecutionOutcome::success()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(failure_rate: f64) -> ExecutionConfig {
        ExecutionConfig {
            min_units: 1,
            max_units: 3,
            unit_ms: 1,
            failure_rate,
        }
    }

    #[tokio::test]
    async fn certain_failure_always_fails() {
        let exec = SimulatedExecutor::new(config(1.0));
        let task = Task::new(1, "x", 3);
        for _ in 0..5 {
            let outcome = exec.execute(&task).await;
            assert_eq!(outcome.reason.as_deref(), Some(SIMULATED_FAILURE));
        }
    }

    #[tokio::test]
    async fn zero_failure_rate_always_succeeds() {
        let exec = SimulatedExecutor::new(config(0.0));
        let task = Task::new(1, "x", 3);
        for _ in 0..5 {
            assert!(exec.execute(&task).await.is_success());
        }
    }

    #[test]
    fn drawn_duration_stays_in_range() {
        let exec = SimulatedExecutor::new(config(0.5));
        for _ in 0..100 {
            let (d, _) = exec.draw();
            assert!(d >= Duration::from_millis(1) && d <= Duration::from_millis(3));
        }
    }

    #[tokio::test]
    async fn scripted_executor_fails_selected_tasks() {
        let exec = ScriptedExecutor::succeeding(Duration::ZERO).fail_task(2);
        assert!(exec.execute(&Task::new(1, "a", 3)).await.is_success());
        assert!(!exec.execute(&Task::new(2, "b", 3)).await.is_success());
        assert_eq!(exec.executed(), vec![TaskId::new(1), TaskId::new(2)]);
    }
}
