//! WorkerGroup - ワーカーごとの実行ループ
//!
//! # フロー
//! 1. inbox (または shutdown シグナル) を待つ
//! 2. board からタスクを取得し、busy にする
//! 3. `TaskExecutor` で実行
//! 4. 成功 -> completed / 失敗・panic -> `handle_error`
//! 5. guard が busy 解除と performance 記録を行い、1 に戻る

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::reporter::StatusReporter;
use super::worker::Worker;
use crate::domain::{ExecutionOutcome, TaskId};
use crate::ports::TaskExecutor;

/// Handles of the spawned loops.
/// - `request_shutdown` で全ループが新しいタスクを取らなくなる
/// - 実行中のタスクは最後まで走らせる
pub struct WorkerGroup {
    shutdown_tx: watch::Sender<bool>,
    joins: Vec<JoinHandle<()>>,
}

impl WorkerGroup {
    /// Spawn one loop per worker. Must be called inside a tokio runtime.
    pub fn spawn(
        workers: &[Arc<Worker>],
        reporter: StatusReporter,
        executor: Arc<dyn TaskExecutor>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let joins = workers
            .iter()
            .map(|worker| {
                let worker = Arc::clone(worker);
                let reporter = reporter.clone();
                let executor = Arc::clone(&executor);
                let rx = shutdown_rx.clone();
                tokio::spawn(async move {
                    worker_loop(worker, reporter, executor, rx).await;
                })
            })
            .collect();

        Self { shutdown_tx, joins }
    }

    /// A receiver on this group's shutdown signal, for the orchestration loop.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    pub fn len(&self) -> usize {
        self.joins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joins.is_empty()
    }

    pub fn request_shutdown(&self) {
        // receivers may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    /// Shutdown and wait for every loop.
    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        for join in self.joins {
            let _ = join.await;
        }
    }

    /// Shutdown and wait at most `grace`; loops still running after that are
    /// aborted. Returns true if every loop finished on its own.
    pub async fn shutdown_within(self, grace: Duration) -> bool {
        self.request_shutdown();
        let aborts: Vec<_> = self.joins.iter().map(JoinHandle::abort_handle).collect();
        let joins = self.joins;
        let finished = tokio::time::timeout(grace, async move {
            for join in joins {
                let _ = join.await;
            }
        })
        .await
        .is_ok();

        if !finished {
            tracing::warn!(?grace, "worker loops did not stop in time; abandoning them");
            for abort in aborts {
                abort.abort();
            }
        }
        finished
    }
}

async fn worker_loop(
    worker: Arc<Worker>,
    reporter: StatusReporter,
    executor: Arc<dyn TaskExecutor>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    tracing::debug!(worker = %worker.name(), "worker loop started");
    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        let task_id = tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
            id = worker.inbox().pop() => id,
        };

        handle(&worker, &reporter, executor.as_ref(), task_id).await;
    }
    tracing::debug!(worker = %worker.name(), "worker loop stopped");
}

async fn handle(
    worker: &Worker,
    reporter: &StatusReporter,
    executor: &dyn TaskExecutor,
    task_id: TaskId,
) {
    let Some(task) = reporter.board().get(task_id) else {
        tracing::warn!(worker = %worker.name(), task_id = %task_id, "queued task is not on the board");
        return;
    };
    if task.status.is_terminal() {
        tracing::debug!(worker = %worker.name(), task_id = %task_id, status = %task.status, "queued task already finished");
        return;
    }

    let _busy = worker.begin(task.description.clone());
    reporter.started(worker.name(), &task);

    let outcome = AssertUnwindSafe(executor.execute(&task))
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| {
            ExecutionOutcome::failure(format!("executor panicked: {}", panic_message(&*payload)))
        });
    if outcome.is_success() {
        reporter.completed(worker.name(), task_id);
    } else {
        let reason = outcome.reason.as_deref().unwrap_or("execution failed");
        reporter.handle_error(task_id, reason);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
