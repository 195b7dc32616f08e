//! Task board: the authoritative, shared task collection.
//!
//! Design:
//! - Every task lives behind its own mutex; one lock scope per mutation.
//! - The outer `RwLock` only guards the shape of the collection
//!   (insertion order + id index). It is released before a task is locked.
//! - No lock is held across an `.await`.
//! - Reads are momentary snapshots. A status read in one call may be stale by
//!   the next, so every state transition re-checks under the task's lock.

mod graph;

pub use graph::DependencyGraph;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use crate::app::status::StatusCounts;
use crate::domain::{Task, TaskId, TaskStatus};
use crate::error::LoomError;

type Slot = Arc<Mutex<Task>>;

#[derive(Default)]
struct Slots {
    order: Vec<TaskId>,
    by_id: HashMap<TaskId, Slot>,
}

#[derive(Default)]
pub struct TaskBoard {
    slots: RwLock<Slots>,
}

fn lock(slot: &Slot) -> MutexGuard<'_, Task> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TaskBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from tasks in order. Fails on the first duplicate id.
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Result<Self, LoomError> {
        let board = Self::new();
        for task in tasks {
            board.insert(task)?;
        }
        Ok(board)
    }

    pub fn insert(&self, task: Task) -> Result<(), LoomError> {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        if slots.by_id.contains_key(&task.id) {
            return Err(LoomError::DuplicateTask(task.id));
        }
        slots.order.push(task.id);
        slots.by_id.insert(task.id, Arc::new(Mutex::new(task)));
        Ok(())
    }

    fn slot(&self, id: TaskId) -> Option<Slot> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.by_id.get(&id).cloned()
    }

    fn slots_in_order(&self) -> Vec<Slot> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots
            .order
            .iter()
            .filter_map(|id| slots.by_id.get(id).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .order
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.slot(id).is_some()
    }

    /// Task ids in insertion order.
    pub fn ids(&self) -> Vec<TaskId> {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .order
            .clone()
    }

    /// Largest id on the board.
    pub fn max_id(&self) -> Option<TaskId> {
        self.ids().into_iter().max()
    }

    /// Copy of one task.
    pub fn get(&self, id: TaskId) -> Option<Task> {
        self.slot(id).map(|slot| lock(&slot).clone())
    }

    /// Copy of every task, in insertion order.
    pub fn snapshot(&self) -> Vec<Task> {
        self.slots_in_order()
            .iter()
            .map(|slot| lock(slot).clone())
            .collect()
    }

    /// Run `f` on one task inside that task's lock scope.
    pub fn with_task<R>(&self, id: TaskId, f: impl FnOnce(&mut Task) -> R) -> Option<R> {
        let slot = self.slot(id)?;
        let mut task = lock(&slot);
        Some(f(&mut task))
    }

    /// Run `f` on every task, each under its own lock, in insertion order.
    pub fn for_each_mut(&self, mut f: impl FnMut(&mut Task)) {
        for slot in self.slots_in_order() {
            f(&mut lock(&slot));
        }
    }

    /// Completion flag of `id`; unknown ids are never complete.
    pub fn is_complete(&self, id: TaskId) -> bool {
        self.slot(id).is_some_and(|slot| lock(&slot).is_completed)
    }

    /// `None` for an unknown task.
    ///
    /// The dependency list is copied out first so no two task locks are
    /// ever held together (a self-dependency would otherwise deadlock).
    pub fn is_ready(&self, id: TaskId) -> Option<bool> {
        let task = self.get(id)?;
        Some(task.is_ready_with(|dep| self.is_complete(dep)))
    }

    /// Set the status of `id`. Returns false for an unknown id.
    pub fn update_status(&self, id: TaskId, status: TaskStatus) -> bool {
        self.with_task(id, |task| task.status = status).is_some()
    }

    pub fn ids_with_status(&self, status: TaskStatus) -> Vec<TaskId> {
        self.slots_in_order()
            .iter()
            .filter_map(|slot| {
                let task = lock(slot);
                (task.status == status).then_some(task.id)
            })
            .collect()
    }

    pub fn pending_ids(&self) -> Vec<TaskId> {
        self.ids_with_status(TaskStatus::Pending)
    }

    pub fn counts(&self) -> StatusCounts {
        self.slots_in_order()
            .iter()
            .map(|slot| lock(slot).status)
            .collect()
    }

    pub fn dependency_graph(&self) -> DependencyGraph {
        DependencyGraph::from_tasks(&self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WorkerName;

    fn board() -> TaskBoard {
        TaskBoard::from_tasks([
            Task::new(1, "analyze data", 1),
            Task::new(2, "market research", 2).depends_on(1),
            Task::new(3, "code review", 2).depends_on(1).depends_on(2),
        ])
        .unwrap()
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let board = board();
        let err = board.insert(Task::new(2, "again", 3)).unwrap_err();
        assert!(matches!(err, LoomError::DuplicateTask(id) if id == TaskId::new(2)));
        assert_eq!(board.len(), 3);
    }

    #[test]
    fn snapshot_keeps_insertion_order() {
        let ids: Vec<_> = board().snapshot().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![TaskId::new(1), TaskId::new(2), TaskId::new(3)]);
    }

    #[test]
    fn readiness_follows_completion_flags() {
        let board = board();
        assert_eq!(board.is_ready(TaskId::new(1)), Some(true));
        assert_eq!(board.is_ready(TaskId::new(2)), Some(false));
        assert_eq!(board.is_ready(TaskId::new(99)), None);

        board.with_task(TaskId::new(1), Task::mark_completed);
        assert_eq!(board.is_ready(TaskId::new(2)), Some(true));
        assert_eq!(board.is_ready(TaskId::new(3)), Some(false));
    }

    #[test]
    fn status_alone_does_not_make_a_dependency_complete() {
        let board = board();
        board.update_status(TaskId::new(1), TaskStatus::Completed);
        assert_eq!(board.is_ready(TaskId::new(2)), Some(false));
    }

    #[test]
    fn dangling_dependency_is_never_ready() {
        let board = TaskBoard::from_tasks([Task::new(5, "x", 3).depends_on(42)]).unwrap();
        assert_eq!(board.is_ready(TaskId::new(5)), Some(false));
    }

    #[test]
    fn self_dependency_does_not_deadlock() {
        let board = TaskBoard::from_tasks([Task::new(1, "x", 3).depends_on(1)]).unwrap();
        assert_eq!(board.is_ready(TaskId::new(1)), Some(false));
    }

    #[test]
    fn update_status_ignores_unknown_ids() {
        let board = board();
        assert!(!board.update_status(TaskId::new(77), TaskStatus::Completed));
        assert!(board.update_status(TaskId::new(1), TaskStatus::Error));
        assert_eq!(board.get(TaskId::new(1)).unwrap().status, TaskStatus::Error);
    }

    #[test]
    fn pending_listing_and_counts() {
        let board = board();
        board.with_task(TaskId::new(1), |t| t.try_assign(WorkerName::new("Jexi")));
        assert_eq!(board.pending_ids(), vec![TaskId::new(2), TaskId::new(3)]);

        let counts = board.counts();
        assert_eq!(counts.pending, 2);
        assert_eq!(counts.assigned, 1);
        assert_eq!(board.max_id(), Some(TaskId::new(3)));
    }

    #[test]
    fn concurrent_mutations_on_different_tasks_are_not_lost() {
        let board = Arc::new(TaskBoard::from_tasks((1..=50).map(|n| Task::new(n, "x", 3))).unwrap());
        let handles: Vec<_> = (1..=50u64)
            .map(|n| {
                let board = Arc::clone(&board);
                std::thread::spawn(move || {
                    board.with_task(TaskId::new(n), Task::mark_completed);
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(board.counts().completed, 50);
    }
}
