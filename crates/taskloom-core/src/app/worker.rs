//! Worker handle: profile, inbox, busy flag and performance record.
//!
//! Ownership split:
//! - the manager only pushes onto the inbox and reads `is_busy`
//! - the worker's own loop pops the inbox, flips `busy` and appends to the
//!   performance record (through `BusyGuard`)

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use tokio::sync::Notify;
use tokio::time::Instant;

use crate::domain::{PerformanceEntry, PerformanceSummary, TaskId, WorkerName, WorkerProfile};

/// FIFO of task ids waiting for one worker.
///
/// `push` never blocks on the consumer. `pop` suspends until something is
/// pushed; a push that happens while nobody waits leaves a permit behind,
/// so no wakeup is lost.
#[derive(Debug, Default)]
pub struct WorkerInbox {
    queue: Mutex<VecDeque<TaskId>>,
    notify: Notify,
}

impl WorkerInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, id: TaskId) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(id);
        self.notify.notify_one();
    }

    pub fn try_pop(&self) -> Option<TaskId> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    /// Front of the queue, waiting for a push if it is empty.
    /// Cancel-safe: dropping the future never loses a queued id.
    pub async fn pop(&self) -> TaskId {
        loop {
            if let Some(id) = self.try_pop() {
                return id;
            }
            self.notify.notified().await;
        }
    }

    pub fn len(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Queued ids, front first.
    pub fn pending(&self) -> Vec<TaskId> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .collect()
    }
}

#[derive(Debug)]
pub struct Worker {
    profile: WorkerProfile,
    inbox: WorkerInbox,
    busy: AtomicBool,
    performance: Mutex<Vec<PerformanceEntry>>,
}

impl Worker {
    pub fn new(profile: WorkerProfile) -> Self {
        Self {
            profile,
            inbox: WorkerInbox::new(),
            busy: AtomicBool::new(false),
            performance: Mutex::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &WorkerName {
        &self.profile.name
    }

    pub fn profile(&self) -> &WorkerProfile {
        &self.profile
    }

    pub fn capabilities(&self) -> &[String] {
        &self.profile.capabilities
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Queue `id` for this worker. Does not touch the busy flag.
    pub fn enqueue(&self, id: TaskId) {
        self.inbox.push(id);
    }

    pub fn inbox(&self) -> &WorkerInbox {
        &self.inbox
    }

    /// Performance record in the order tasks were handled.
    pub fn performance(&self) -> Vec<PerformanceEntry> {
        self.performance
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn performance_summary(&self) -> PerformanceSummary {
        let record = self.performance.lock().unwrap_or_else(PoisonError::into_inner);
        PerformanceSummary::from_entries(&record)
    }

    /// Mark the worker busy with `description` until the guard drops.
    pub(crate) fn begin(&self, description: impl Into<String>) -> BusyGuard<'_> {
        self.busy.store(true, Ordering::Release);
        BusyGuard {
            worker: self,
            description: description.into(),
            started: Instant::now(),
        }
    }
}

/// Resets the busy flag and records elapsed time on every exit path,
/// including a panic inside the executor.
pub(crate) struct BusyGuard<'a> {
    worker: &'a Worker,
    description: String,
    started: Instant,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let entry = PerformanceEntry {
            description: std::mem::take(&mut self.description),
            elapsed: self.started.elapsed(),
        };
        self.worker
            .performance
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
        self.worker.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn worker() -> Worker {
        Worker::new(WorkerProfile::new("Jexi", "Data Analyst", ["analyze data"]))
    }

    #[test]
    fn inbox_is_fifo() {
        let inbox = WorkerInbox::new();
        inbox.push(TaskId::new(3));
        inbox.push(TaskId::new(1));
        inbox.push(TaskId::new(2));
        assert_eq!(
            inbox.pending(),
            vec![TaskId::new(3), TaskId::new(1), TaskId::new(2)]
        );
        assert_eq!(inbox.try_pop(), Some(TaskId::new(3)));
        assert_eq!(inbox.len(), 2);
    }

    #[tokio::test]
    async fn pop_wakes_on_push() {
        let inbox = Arc::new(WorkerInbox::new());
        let waiter = {
            let inbox = Arc::clone(&inbox);
            tokio::spawn(async move { inbox.pop().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        inbox.push(TaskId::new(7));

        let got = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("pop woke up")
            .unwrap();
        assert_eq!(got, TaskId::new(7));
        assert!(inbox.is_empty());
    }

    #[tokio::test]
    async fn push_before_pop_is_not_lost() {
        let inbox = WorkerInbox::new();
        inbox.push(TaskId::new(1));
        let got = tokio::time::timeout(Duration::from_secs(1), inbox.pop())
            .await
            .unwrap();
        assert_eq!(got, TaskId::new(1));
    }

    #[test]
    fn enqueue_leaves_worker_idle() {
        let w = worker();
        w.enqueue(TaskId::new(1));
        w.enqueue(TaskId::new(2));
        assert!(!w.is_busy());
        assert_eq!(w.inbox().len(), 2);
    }

    #[test]
    fn guard_sets_and_clears_busy_and_records() {
        let w = worker();
        {
            let _guard = w.begin("analyze data");
            assert!(w.is_busy());
        }
        assert!(!w.is_busy());
        let record = w.performance();
        assert_eq!(record.len(), 1);
        assert_eq!(record[0].description, "analyze data");
        assert_eq!(w.performance_summary().handled, 1);
    }

    #[test]
    fn guard_runs_on_panic() {
        let w = Arc::new(worker());
        let w2 = Arc::clone(&w);
        let result = std::thread::spawn(move || {
            let _guard = w2.begin("boom");
            panic!("executor blew up");
        })
        .join();

        assert!(result.is_err());
        assert!(!w.is_busy());
        assert_eq!(w.performance().len(), 1);
    }
}
