//! taskloom-core: capability-matched task scheduling.
//!
//! - `domain`: tasks, workers, outcomes, events
//! - `ports`: traits for clock, persistence, rendering, execution, diagnostics
//! - `impls`: default and test implementations of the ports
//! - `board`: the shared task board and dependency graph
//! - `app`: prioritizer, dispatcher, worker loops, task manager
//! - `config`: scheduler configuration

pub mod app;
pub mod board;
pub mod config;
pub mod domain;
pub mod error;
pub mod impls;
pub mod ports;

pub use app::{TaskManager, TaskManagerBuilder, WorkerGroup};
pub use config::SchedulerConfig;
pub use error::LoomError;
