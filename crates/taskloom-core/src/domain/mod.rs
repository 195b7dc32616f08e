//! Domain model (ids, tasks, workers, outcomes, diagnostic events).

pub mod events;
pub mod ids;
pub mod outcome;
pub mod state;
pub mod task;
pub mod worker;

pub use events::{DiagnosticEvent, EventLevel};
pub use ids::{TaskId, WorkerName};
pub use outcome::{DispatchOutcome, ExecutionOutcome, OutcomeKind};
pub use state::TaskStatus;
pub use task::{HIGHEST_PRIORITY, Task};
pub use worker::{PerformanceEntry, PerformanceSummary, WorkerProfile};
