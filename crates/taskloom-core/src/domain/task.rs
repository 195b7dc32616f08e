//! Task record: identity plus lifecycle state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{TaskId, TaskStatus, WorkerName};

/// Most urgent priority level.
pub const HIGHEST_PRIORITY: u8 = 1;

/// A unit of work.
///
/// Dependencies are held by id and resolved against the task board, so a
/// persisted task set can be reloaded without pointer fix-ups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub description: String,

    /// Lower is more urgent; 1 is the most urgent level.
    pub priority: u8,

    #[serde(default)]
    pub deadline: Option<NaiveDate>,

    /// Tasks this one waits for, in submission order.
    #[serde(default)]
    pub dependencies: Vec<TaskId>,

    pub status: TaskStatus,

    #[serde(default)]
    pub assigned_to: Option<WorkerName>,

    #[serde(default)]
    pub is_completed: bool,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, description: impl Into<String>, priority: u8) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            priority,
            deadline: None,
            dependencies: Vec::new(),
            status: TaskStatus::Pending,
            assigned_to: None,
            is_completed: false,
        }
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Add a dependency. Duplicates are ignored so the list stays a set.
    pub fn depends_on(mut self, dependency: impl Into<TaskId>) -> Self {
        let dependency = dependency.into();
        if !self.dependencies.contains(&dependency) {
            self.dependencies.push(dependency);
        }
        self
    }

    /// Whole days from `today` until the deadline (negative once overdue).
    pub fn days_until_deadline(&self, today: NaiveDate) -> Option<i64> {
        self.deadline.map(|d| (d - today).num_days())
    }

    /// Readiness given a lookup of each dependency's completion flag.
    ///
    /// `is_complete` returns `false` for ids it does not know.
    pub fn is_ready_with(&self, mut is_complete: impl FnMut(TaskId) -> bool) -> bool {
        self.dependencies.iter().all(|dep| is_complete(*dep))
    }

    /// Pending -> Assigned. Returns false (and changes nothing) if the task
    /// is no longer pending.
    pub fn try_assign(&mut self, worker: WorkerName) -> bool {
        if !self.status.is_dispatchable() {
            return false;
        }
        self.status = TaskStatus::Assigned;
        self.assigned_to = Some(worker);
        true
    }

    pub fn mark_completed(&mut self) {
        self.is_completed = true;
        self.status = TaskStatus::Completed;
    }

    pub fn mark_error(&mut self) {
        self.status = TaskStatus::Error;
    }

    /// Assigned -> Pending for a task whose worker queue no longer exists.
    /// A task already flagged complete is left for reconciliation.
    pub fn release(&mut self) -> bool {
        if self.status != TaskStatus::Assigned || self.is_completed {
            return false;
        }
        self.status = TaskStatus::Pending;
        self.assigned_to = None;
        true
    }
}
