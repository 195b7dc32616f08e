//! Ports - seams between the scheduling core and everything around it.
//!
//! The core only talks to persistence, rendering, diagnostics, time and
//! task execution through these traits. Concrete implementations live in
//! `impls`.

pub mod clock;
pub mod event_sink;
pub mod executor;
pub mod matcher;
pub mod renderer;
pub mod task_store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::event_sink::EventSink;
pub use self::executor::TaskExecutor;
pub use self::matcher::CapabilityMatcher;
pub use self::renderer::GraphRenderer;
pub use self::task_store::TaskStore;
