//! Status - task counts and per-cycle reports.

use serde::{Deserialize, Serialize};

use crate::domain::TaskStatus;

/// Number of tasks in each status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub assigned: usize,
    pub completed: usize,
    pub error: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: TaskStatus) {
        match status {
            TaskStatus::Pending => self.pending += 1,
            TaskStatus::Assigned => self.assigned += 1,
            TaskStatus::Completed => self.completed += 1,
            TaskStatus::Error => self.error += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.pending + self.assigned + self.completed + self.error
    }

    /// Every task is either completed or failed.
    pub fn is_settled(&self) -> bool {
        self.pending == 0 && self.assigned == 0
    }
}

impl FromIterator<TaskStatus> for StatusCounts {
    fn from_iter<I: IntoIterator<Item = TaskStatus>>(iter: I) -> Self {
        let mut counts = Self::default();
        for status in iter {
            counts.record(status);
        }
        counts
    }
}

/// What one orchestration cycle did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle: u64,
    pub reprioritized: usize,
    pub assigned: usize,
    pub waiting: usize,
    pub unmatched: usize,
    pub reconciled: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_collect_from_statuses() {
        let counts: StatusCounts = [
            TaskStatus::Pending,
            TaskStatus::Pending,
            TaskStatus::Completed,
            TaskStatus::Error,
        ]
        .into_iter()
        .collect();
        assert_eq!(counts.pending, 2);
        assert_eq!(counts.completed, 1);
        assert_eq!(counts.error, 1);
        assert_eq!(counts.total(), 4);
        assert!(!counts.is_settled());
    }

    #[test]
    fn terminal_only_board_is_settled() {
        let counts: StatusCounts = [TaskStatus::Completed, TaskStatus::Error]
            .into_iter()
            .collect();
        assert!(counts.is_settled());
    }
}
