//! StatusReporter - status writes shared by the manager and worker loops.

use std::sync::Arc;

use crate::board::TaskBoard;
use crate::domain::{DiagnosticEvent, Task, TaskId, TaskStatus, WorkerName};
use crate::ports::EventSink;

/// Cheap to clone; every clone writes to the same board and sink.
#[derive(Clone)]
pub struct StatusReporter {
    board: Arc<TaskBoard>,
    sink: Arc<dyn EventSink>,
}

impl StatusReporter {
    pub fn new(board: Arc<TaskBoard>, sink: Arc<dyn EventSink>) -> Self {
        Self { board, sink }
    }

    pub fn board(&self) -> &Arc<TaskBoard> {
        &self.board
    }

    pub fn emit(&self, event: DiagnosticEvent) {
        self.sink.emit(event);
    }

    /// Set the status of `id`. Unknown ids are ignored.
    pub fn update_status(&self, id: TaskId, status: TaskStatus) -> bool {
        self.board.update_status(id, status)
    }

    /// Move `id` to terminal `Error`. The completion flag is left alone.
    pub fn handle_error(&self, id: TaskId, message: &str) -> bool {
        let Some(description) = self.board.with_task(id, |task| {
            task.mark_error();
            task.description.clone()
        }) else {
            tracing::warn!(task_id = %id, "error reported for unknown task");
            return false;
        };
        self.emit(
            DiagnosticEvent::error(format!(
                "Error in task {} ({description}): {message}",
                id.get()
            ))
            .for_task(id),
        );
        true
    }

    pub(crate) fn started(&self, worker: &WorkerName, task: &Task) {
        self.emit(
            DiagnosticEvent::info(format!("{worker} is working on: {}", task.description))
                .for_task(task.id),
        );
    }

    pub(crate) fn completed(&self, worker: &WorkerName, id: TaskId) -> bool {
        let Some(description) = self.board.with_task(id, |task| {
            task.mark_completed();
            task.description.clone()
        }) else {
            return false;
        };
        self.emit(
            DiagnosticEvent::info(format!("{worker} has completed: {description}")).for_task(id),
        );
        true
    }
}
