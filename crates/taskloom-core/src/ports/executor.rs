//! TaskExecutor port - 「タスクを実行する」の中身
//!
//! # Implementations
//! - **SimulatedExecutor**: random duration, random outcome (default)
//! - **ScriptedExecutor**: fixed durations and outcomes (tests)

use async_trait::async_trait;

use crate::domain::{ExecutionOutcome, Task};

/// TaskExecutor performs one task and reports how it went.
///
/// A failure is a normal return value, not an `Err`: the worker loop turns
/// it into a terminal `Error` status through the manager's error report.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    async fn execute(&self, task: &Task) -> ExecutionOutcome;
}
