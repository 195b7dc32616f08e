//! Outcome model: results of dispatch and execution.
//!
//! Neither outcome is an error in the `Result` sense. A task that cannot be
//! dispatched this cycle stays pending and is retried on the next one; a task
//! whose execution fails becomes terminal `Error`.

use serde::{Deserialize, Serialize};

use super::WorkerName;

/// What happened when the dispatcher looked at one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DispatchOutcome {
    /// Queued on `worker`; the task is now `Assigned`.
    Assigned { worker: WorkerName },

    /// At least one dependency is not complete yet.
    WaitingOnDependencies,

    /// Ready, but no idle worker has a matching capability.
    NoSuitableWorker,

    /// The task was no longer pending (already assigned or terminal).
    NotPending,

    /// No task with that id is on the board.
    UnknownTask,
}

impl DispatchOutcome {
    pub fn is_assigned(&self) -> bool {
        matches!(self, DispatchOutcome::Assigned { .. })
    }
}

/// Result of executing a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub kind: OutcomeKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ExecutionOutcome {
    pub fn success() -> Self {
        Self {
            kind: OutcomeKind::Success,
            reason: None,
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Failure,
            reason: Some(reason.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == OutcomeKind::Success
    }
}
