//! TaskManagerBuilder - 構築とワイヤリング
//!
//! # Fail-fast 設計
//! - ワーカーが 0 人なら `BuildError::EmptyRoster`
//! - 同名ワーカーは `BuildError::DuplicateWorker`
//! - 同じ id のタスクは `BuildError::DuplicateTask`
//!
//! 依存関係の問題は Warning で報告するだけで、構築は止めない。

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use super::dispatcher::Dispatcher;
use super::manager::TaskManager;
use super::prioritizer::{Prioritizer, PrioritizerConfig};
use super::reporter::StatusReporter;
use super::worker::Worker;
use crate::board::TaskBoard;
use crate::config::ExecutionConfig;
use crate::domain::{Task, TaskId, WorkerName, WorkerProfile};
use crate::error::LoomError;
use crate::impls::{SimulatedExecutor, SubstringMatcher, TracingSink};
use crate::ports::{
    CapabilityMatcher, Clock, EventSink, GraphRenderer, SystemClock, TaskExecutor, TaskStore,
};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no workers configured; at least one worker is required")]
    EmptyRoster,

    #[error("worker name {0} is used more than once")]
    DuplicateWorker(WorkerName),

    #[error("task id {} is used more than once", .0.get())]
    DuplicateTask(TaskId),
}

/// # Example
/// ```ignore
/// let manager = TaskManagerBuilder::new()
///     .workers(config.workers.clone())
///     .tasks(seed::default_tasks(today))
///     .store(Arc::new(JsonFileStore::new("state.json")))
///     .build()?;
/// let group = manager.spawn_workers();
/// ```
pub struct TaskManagerBuilder {
    workers: Vec<WorkerProfile>,
    tasks: Vec<Task>,
    matcher: Arc<dyn CapabilityMatcher>,
    executor: Arc<dyn TaskExecutor>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn EventSink>,
    store: Option<Arc<dyn TaskStore>>,
    renderer: Option<Arc<dyn GraphRenderer>>,
    prioritizer: PrioritizerConfig,
    render_each_cycle: bool,
}

impl TaskManagerBuilder {
    pub fn new() -> Self {
        Self {
            workers: Vec::new(),
            tasks: Vec::new(),
            matcher: Arc::new(SubstringMatcher),
            executor: Arc::new(SimulatedExecutor::new(ExecutionConfig::default())),
            clock: Arc::new(SystemClock),
            sink: Arc::new(TracingSink),
            store: None,
            renderer: None,
            prioritizer: PrioritizerConfig::default(),
            render_each_cycle: true,
        }
    }

    pub fn worker(mut self, profile: WorkerProfile) -> Self {
        self.workers.push(profile);
        self
    }

    pub fn workers(mut self, profiles: impl IntoIterator<Item = WorkerProfile>) -> Self {
        self.workers.extend(profiles);
        self
    }

    pub fn task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn tasks(mut self, tasks: impl IntoIterator<Item = Task>) -> Self {
        self.tasks.extend(tasks);
        self
    }

    pub fn matcher(mut self, matcher: Arc<dyn CapabilityMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn executor(mut self, executor: Arc<dyn TaskExecutor>) -> Self {
        self.executor = executor;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn store(mut self, store: Arc<dyn TaskStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn renderer(mut self, renderer: Arc<dyn GraphRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn prioritizer(mut self, config: PrioritizerConfig) -> Self {
        self.prioritizer = config;
        self
    }

    pub fn render_each_cycle(mut self, enabled: bool) -> Self {
        self.render_each_cycle = enabled;
        self
    }

    /// Validate and wire everything. Dependency problems (cycles, unknown
    /// ids) are reported as warnings, not errors. Tasks loaded as
    /// `Assigned` go back to `Pending`, since no worker queue holds them.
    pub fn build(self) -> Result<TaskManager, BuildError> {
        if self.workers.is_empty() {
            return Err(BuildError::EmptyRoster);
        }
        let mut names = HashSet::new();
        for profile in &self.workers {
            if !names.insert(&profile.name) {
                return Err(BuildError::DuplicateWorker(profile.name.clone()));
            }
        }

        let board = TaskBoard::new();
        for task in self.tasks {
            let id = task.id;
            if let Err(LoomError::DuplicateTask(_)) = board.insert(task) {
                return Err(BuildError::DuplicateTask(id));
            }
        }
        let board = Arc::new(board);

        let workers = self
            .workers
            .into_iter()
            .map(|profile| Arc::new(Worker::new(profile)))
            .collect();

        let manager = TaskManager {
            reporter: StatusReporter::new(Arc::clone(&board), self.sink),
            dispatcher: Dispatcher::new(workers, self.matcher),
            prioritizer: Prioritizer::new(self.prioritizer),
            board,
            clock: self.clock,
            executor: self.executor,
            store: self.store,
            renderer: self.renderer,
            render_each_cycle: self.render_each_cycle,
            cycles: AtomicU64::new(0),
        };
        manager.requeue_stranded();
        manager.audit_dependencies();
        Ok(manager)
    }
}

impl Default for TaskManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventLevel;
    use crate::impls::MemorySink;

    fn jexi() -> WorkerProfile {
        WorkerProfile::new("Jexi", "Data Analyst", ["analyze data"])
    }

    #[test]
    fn empty_roster_is_rejected() {
        let err = TaskManagerBuilder::new().build().err().unwrap();
        assert!(matches!(err, BuildError::EmptyRoster));
    }

    #[test]
    fn duplicate_worker_is_rejected() {
        let err = TaskManagerBuilder::new()
            .worker(jexi())
            .worker(jexi())
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, BuildError::DuplicateWorker(name) if name.as_str() == "Jexi"));
    }

    #[test]
    fn duplicate_task_is_rejected() {
        let err = TaskManagerBuilder::new()
            .worker(jexi())
            .task(Task::new(1, "a", 1))
            .task(Task::new(1, "b", 1))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, BuildError::DuplicateTask(id) if id == TaskId::new(1)));
        assert_eq!(err.to_string(), "task id 1 is used more than once");
    }

    #[test]
    fn cycles_and_unknown_dependencies_are_warned_not_rejected() {
        let sink = Arc::new(MemorySink::new());
        let manager = TaskManagerBuilder::new()
            .worker(jexi())
            .sink(sink.clone())
            .task(Task::new(1, "a", 1).depends_on(2))
            .task(Task::new(2, "b", 1).depends_on(1))
            .task(Task::new(3, "c", 1).depends_on(42))
            .build()
            .unwrap();

        assert_eq!(manager.board().len(), 3);
        assert_eq!(sink.count(EventLevel::Warning, "Dependency cycle detected"), 1);
        assert_eq!(sink.count(EventLevel::Warning, "unknown task 42"), 1);
    }

    #[test]
    fn workers_keep_roster_order() {
        let manager = TaskManagerBuilder::new()
            .workers([
                jexi(),
                WorkerProfile::new("Nova", "Task Executor", ["automation"]),
            ])
            .build()
            .unwrap();
        let names: Vec<_> = manager
            .workers()
            .iter()
            .map(|w| w.name().to_string())
            .collect();
        assert_eq!(names, vec!["Jexi", "Nova"]);
    }
}
