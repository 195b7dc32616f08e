//! Dispatcher - capability に基づく 1 タスクの割り当て

use std::sync::Arc;

use rand::seq::SliceRandom;

use super::worker::Worker;
use crate::board::TaskBoard;
use crate::domain::{DispatchOutcome, TaskId, TaskStatus};
use crate::ports::CapabilityMatcher;

pub struct Dispatcher {
    workers: Vec<Arc<Worker>>,
    matcher: Arc<dyn CapabilityMatcher>,
}

impl Dispatcher {
    pub fn new(workers: Vec<Arc<Worker>>, matcher: Arc<dyn CapabilityMatcher>) -> Self {
        Self { workers, matcher }
    }

    pub fn workers(&self) -> &[Arc<Worker>] {
        &self.workers
    }

    /// Idle workers with a capability matching `description`.
    pub fn candidates(&self, description: &str) -> Vec<&Arc<Worker>> {
        self.workers
            .iter()
            .filter(|w| !w.is_busy() && self.matcher.accepts(w.capabilities(), description))
            .collect()
    }

    /// Try to assign task `id`.
    ///
    /// Dependency readiness is checked before candidates, so a blocked task
    /// reports `WaitingOnDependencies` even when nobody could take it.
    /// The chosen worker is picked uniformly at random.
    pub fn assign(&self, board: &TaskBoard, id: TaskId) -> DispatchOutcome {
        let Some(task) = board.get(id) else {
            return DispatchOutcome::UnknownTask;
        };
        if task.status != TaskStatus::Pending {
            return DispatchOutcome::NotPending;
        }
        if !board.is_ready(id).unwrap_or(false) {
            return DispatchOutcome::WaitingOnDependencies;
        }

        let chosen = {
            let candidates = self.candidates(&task.description);
            match candidates.choose(&mut rand::thread_rng()) {
                Some(worker) => Arc::clone(*worker),
                None => return DispatchOutcome::NoSuitableWorker,
            }
        };

        // タスクのロック下で Pending -> Assigned を再確認する。
        // 先に遷移した側が勝ち、この dispatch は何もしない。
        let won = board
            .with_task(id, |task| task.try_assign(chosen.name().clone()))
            .unwrap_or(false);
        if !won {
            return DispatchOutcome::NotPending;
        }

        chosen.enqueue(id);
        DispatchOutcome::Assigned {
            worker: chosen.name().clone(),
        }
    }
}
