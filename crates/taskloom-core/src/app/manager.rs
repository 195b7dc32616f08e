//! TaskManager - board を持ち、オーケストレーションサイクルを回す
//!
//! # サイクル
//! 1. 全タスクに Prioritizer
//! 2. Pending -> `assign_task`、その後 assigned かつ完了済み -> `Completed`
//! 3. 保存してから描画 (失敗は Warning 診断になる)

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use super::dispatcher::Dispatcher;
use super::prioritizer::Prioritizer;
use super::reporter::StatusReporter;
use super::status::{CycleReport, StatusCounts};
use super::worker::Worker;
use super::worker_loop::WorkerGroup;
use crate::board::{DependencyGraph, TaskBoard};
use crate::domain::{DiagnosticEvent, DispatchOutcome, Task, TaskId, TaskStatus};
use crate::error::LoomError;
use crate::ports::{Clock, GraphRenderer, TaskExecutor, TaskStore};

pub struct TaskManager {
    pub(crate) board: Arc<TaskBoard>,
    pub(crate) dispatcher: Dispatcher,
    pub(crate) prioritizer: Prioritizer,
    pub(crate) reporter: StatusReporter,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) executor: Arc<dyn TaskExecutor>,
    pub(crate) store: Option<Arc<dyn TaskStore>>,
    pub(crate) renderer: Option<Arc<dyn GraphRenderer>>,
    pub(crate) render_each_cycle: bool,
    pub(crate) cycles: AtomicU64,
}

impl TaskManager {
    pub fn board(&self) -> &Arc<TaskBoard> {
        &self.board
    }

    pub fn workers(&self) -> &[Arc<Worker>] {
        self.dispatcher.workers()
    }

    pub fn reporter(&self) -> StatusReporter {
        self.reporter.clone()
    }

    /// Spawn one execution loop per worker, sharing this manager's board.
    pub fn spawn_workers(&self) -> WorkerGroup {
        WorkerGroup::spawn(
            self.workers(),
            self.reporter(),
            Arc::clone(&self.executor),
        )
    }

    pub fn submit(&self, task: Task) -> Result<(), LoomError> {
        self.board.insert(task)
    }

    pub fn get(&self, id: TaskId) -> Option<Task> {
        self.board.get(id)
    }

    pub fn snapshot(&self) -> Vec<Task> {
        self.board.snapshot()
    }

    pub fn counts(&self) -> StatusCounts {
        self.board.counts()
    }

    /// Number of cycles run so far.
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    /// Dispatch one task and report what happened.
    pub fn assign_task(&self, id: TaskId) -> DispatchOutcome {
        let outcome = self.dispatcher.assign(&self.board, id);
        let description = self
            .board
            .get(id)
            .map(|t| t.description)
            .unwrap_or_default();

        let event = match &outcome {
            DispatchOutcome::Assigned { worker } => {
                DiagnosticEvent::info(format!("Task '{description}' assigned to {worker}."))
            }
            DispatchOutcome::WaitingOnDependencies => DiagnosticEvent::info(format!(
                "Task '{description}' is waiting for dependencies."
            )),
            DispatchOutcome::NoSuitableWorker => DiagnosticEvent::warning(format!(
                "No suitable worker found for task: {description}"
            )),
            DispatchOutcome::NotPending | DispatchOutcome::UnknownTask => return outcome,
        };
        self.reporter.emit(event.for_task(id));
        outcome
    }

    /// Unknown ids are a silent no-op.
    pub fn update_task_status(&self, id: TaskId, status: TaskStatus) -> bool {
        self.reporter.update_status(id, status)
    }

    pub fn handle_error(&self, id: TaskId, message: &str) -> bool {
        self.reporter.handle_error(id, message)
    }

    pub fn prioritize(&self) -> usize {
        self.prioritizer.run(&self.board, self.clock.today())
    }

    /// One orchestration cycle.
    pub async fn run_cycle(&self) -> CycleReport {
        let cycle = self.cycles.fetch_add(1, Ordering::Relaxed) + 1;
        let mut report = CycleReport {
            cycle,
            reprioritized: self.prioritize(),
            ..CycleReport::default()
        };

        for id in self.board.pending_ids() {
            match self.assign_task(id) {
                DispatchOutcome::Assigned { .. } => report.assigned += 1,
                DispatchOutcome::WaitingOnDependencies => report.waiting += 1,
                DispatchOutcome::NoSuitableWorker => report.unmatched += 1,
                DispatchOutcome::NotPending | DispatchOutcome::UnknownTask => {}
            }
        }
        for id in self.board.ids_with_status(TaskStatus::Assigned) {
            if self.board.is_complete(id) && self.update_task_status(id, TaskStatus::Completed) {
                report.reconciled += 1;
            }
        }

        if let Err(e) = self.flush().await {
            self.reporter
                .emit(DiagnosticEvent::warning(format!("Saving task state failed: {e}")));
        }
        if self.render_each_cycle {
            if let Err(e) = self.render().await {
                self.reporter.emit(DiagnosticEvent::warning(format!(
                    "Rendering the dependency graph failed: {e}"
                )));
            }
        }

        tracing::debug!(?report, "cycle finished");
        report
    }

    /// Persist the current snapshot. No-op without a store.
    pub async fn flush(&self) -> Result<(), LoomError> {
        if let Some(store) = &self.store {
            store.save(&self.snapshot()).await?;
        }
        Ok(())
    }

    /// Render the dependency graph. No-op without a renderer.
    pub async fn render(&self) -> Result<(), LoomError> {
        if let Some(renderer) = &self.renderer {
            let tasks = self.snapshot();
            let graph = DependencyGraph::from_tasks(&tasks);
            renderer.render(&tasks, &graph).await?;
        }
        Ok(())
    }

    /// Warn about dependency cycles, dependencies on unknown tasks and
    /// failed tasks that others still wait for. Nothing is rejected;
    /// affected tasks just never become ready.
    /// Returns the number of problems found.
    pub fn audit_dependencies(&self) -> usize {
        let tasks = self.snapshot();
        let graph = DependencyGraph::from_tasks(&tasks);
        let mut problems = 0;

        for task in &tasks {
            for dep in graph
                .dependencies_of(task.id)
                .into_iter()
                .filter(|d| !self.board.contains(*d))
            {
                problems += 1;
                self.reporter.emit(
                    DiagnosticEvent::warning(format!(
                        "Task '{}' depends on unknown task {}; it will never become ready.",
                        task.description,
                        dep.get()
                    ))
                    .for_task(task.id),
                );
            }

            let waiting = graph.dependents_of(task.id);
            if task.status == TaskStatus::Error && !waiting.is_empty() {
                problems += 1;
                let ids: Vec<String> = waiting.iter().map(|id| id.get().to_string()).collect();
                self.reporter.emit(
                    DiagnosticEvent::warning(format!(
                        "Task '{}' failed; tasks {} will never become ready.",
                        task.description,
                        ids.join(", ")
                    ))
                    .for_task(task.id),
                );
            }
        }

        if let Some(cycle) = graph.detect_cycle() {
            problems += 1;
            let path: Vec<String> = cycle.iter().map(|id| id.get().to_string()).collect();
            self.reporter.emit(DiagnosticEvent::warning(format!(
                "Dependency cycle detected: {}",
                path.join(" -> ")
            )));
        }
        problems
    }

    /// Return assigned tasks to `Pending`.
    ///
    /// 読み込んだ直後の状態用。worker のキューは保存されないので、
    /// Assigned のままだと二度と実行されない。完了フラグが立っている
    /// タスクは次のサイクルの reconcile に任せる。
    /// Returns the number of tasks released.
    pub fn requeue_stranded(&self) -> usize {
        let mut released = Vec::new();
        self.board.for_each_mut(|task| {
            let worker = task.assigned_to.clone();
            if task.release() {
                released.push((task.id, task.description.clone(), worker));
            }
        });

        for (id, description, worker) in &released {
            let worker = worker.as_ref().map(|w| w.as_str()).unwrap_or("no worker");
            self.reporter.emit(
                DiagnosticEvent::warning(format!(
                    "Task '{description}' was still queued on {worker}; returning it to Pending."
                ))
                .for_task(*id),
            );
        }
        released.len()
    }

    /// Run cycles every `interval` until `shutdown` fires, then flush.
    /// Returns the number of cycles run.
    pub async fn run(&self, interval: Duration, shutdown: watch::Receiver<bool>) -> u64 {
        self.drive(interval, shutdown, None).await
    }

    /// Like `run`, but also stops after `limit` cycles.
    pub async fn run_cycles(
        &self,
        limit: u64,
        interval: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> u64 {
        self.drive(interval, shutdown, Some(limit)).await
    }

    async fn drive(
        &self,
        interval: Duration,
        mut shutdown: watch::Receiver<bool>,
        limit: Option<u64>,
    ) -> u64 {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ran = 0;

        while limit.is_none_or(|limit| ran < limit) {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                _ = ticker.tick() => {}
            }
            self.run_cycle().await;
            ran += 1;
        }

        if let Err(e) = self.flush().await {
            self.reporter
                .emit(DiagnosticEvent::warning(format!("Saving task state failed: {e}")));
        }
        self.reporter
            .emit(DiagnosticEvent::info("Shutting down task manager."));
        ran
    }
}
