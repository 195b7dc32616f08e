//! Prioritizer - 締め切りに応じた優先度の引き上げ

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::board::TaskBoard;
use crate::domain::{HIGHEST_PRIORITY, Task, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrioritizerConfig {
    /// Deadlines at most this many days away get `urgent_priority`.
    pub urgent_within_days: i64,
    pub urgent_priority: u8,

    /// Otherwise, deadlines at most this many days away get `soon_priority`.
    pub soon_within_days: i64,
    pub soon_priority: u8,
}

impl Default for PrioritizerConfig {
    fn default() -> Self {
        Self {
            urgent_within_days: 2,
            urgent_priority: HIGHEST_PRIORITY,
            soon_within_days: 5,
            soon_priority: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Prioritizer {
    config: PrioritizerConfig,
}

impl Prioritizer {
    pub fn new(config: PrioritizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PrioritizerConfig {
        &self.config
    }

    /// Priority `task` should have on `today`, or `None` to leave it be.
    /// Only pending tasks with a deadline are considered.
    pub fn target_priority(&self, task: &Task, today: NaiveDate) -> Option<u8> {
        if task.status != TaskStatus::Pending {
            return None;
        }
        let days = task.days_until_deadline(today)?;
        if days <= self.config.urgent_within_days {
            Some(self.config.urgent_priority)
        } else if days <= self.config.soon_within_days {
            Some(self.config.soon_priority)
        } else {
            None
        }
    }

    /// Returns true if the priority changed.
    pub fn apply(&self, task: &mut Task, today: NaiveDate) -> bool {
        match self.target_priority(task, today) {
            Some(priority) if priority != task.priority => {
                task.priority = priority;
                true
            }
            _ => false,
        }
    }

    /// One pass over the board. Returns how many priorities changed.
    pub fn run(&self, board: &TaskBoard, today: NaiveDate) -> usize {
        let mut changed = 0;
        board.for_each_mut(|task| {
            if self.apply(task, today) {
                tracing::debug!(task_id = %task.id, priority = task.priority, "priority updated");
                changed += 1;
            }
        });
        changed
    }
}
