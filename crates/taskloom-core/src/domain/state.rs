//! Task lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a task.
///
/// # 状態遷移
/// - Pending -> Assigned (dispatcher)
/// - Assigned -> Completed (実行ループ、成功)
/// - Assigned -> Error (実行ループ、`handle_error` 経由の失敗)
/// - Assigned -> Pending (読み込み時、キューが残っていないとき)
///
/// `Completed` と `Error` は終端。失敗したタスクはリトライしない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Waiting for dependencies or for a capable idle worker.
    Pending,

    /// Queued on exactly one worker.
    Assigned,

    /// Finished successfully.
    Completed,

    /// Execution failed.
    Error,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::Assigned,
        TaskStatus::Completed,
        TaskStatus::Error,
    ];

    /// Is this a terminal state (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Error)
    }

    /// Is the task eligible for dispatch?
    pub fn is_dispatchable(self) -> bool {
        matches!(self, TaskStatus::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Assigned => "Assigned",
            TaskStatus::Completed => "Completed",
            TaskStatus::Error => "Error",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::pending(TaskStatus::Pending, false)]
    #[case::assigned(TaskStatus::Assigned, false)]
    #[case::completed(TaskStatus::Completed, true)]
    #[case::error(TaskStatus::Error, true)]
    fn terminal_states(#[case] status: TaskStatus, #[case] terminal: bool) {
        assert_eq!(status.is_terminal(), terminal);
    }

    #[test]
    fn only_pending_is_dispatchable() {
        let dispatchable: Vec<_> = TaskStatus::ALL
            .into_iter()
            .filter(|s| s.is_dispatchable())
            .collect();
        assert_eq!(dispatchable, vec![TaskStatus::Pending]);
    }

    #[test]
    fn status_serializes_by_name() {
        let s = serde_json::to_string(&TaskStatus::Assigned).unwrap();
        assert_eq!(s, "\"Assigned\"");
    }
}
