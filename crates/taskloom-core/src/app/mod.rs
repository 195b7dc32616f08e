//! App - application layer
//!
//! Combines the board and the ports into the running system.
//!
//! # Components
//! - **TaskManagerBuilder**: wiring and start-up validation
//! - **TaskManager**: orchestration cycle (prioritize -> dispatch -> persist)
//! - **Prioritizer**: deadline-driven priority
//! - **Dispatcher**: capability-based assignment
//! - **WorkerGroup**: one execution loop per worker
//! - **StatusReporter**: status writes shared by manager and loops

pub mod builder;
pub mod dispatcher;
pub mod manager;
pub mod prioritizer;
pub mod reporter;
pub mod seed;
pub mod status;
pub mod worker;
pub mod worker_loop;

pub use self::builder::{BuildError, TaskManagerBuilder};
pub use self::dispatcher::Dispatcher;
pub use self::manager::TaskManager;
pub use self::prioritizer::{Prioritizer, PrioritizerConfig};
pub use self::reporter::StatusReporter;
pub use self::status::{CycleReport, StatusCounts};
pub use self::worker::{Worker, WorkerInbox};
pub use self::worker_loop::WorkerGroup;
