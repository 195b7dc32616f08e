//! Impls - implementations of the ports.
//!
//! # Contents
//! - **SubstringMatcher / ExactTagMatcher**: capability matching policies
//! - **SimulatedExecutor**: random duration and outcome (default)
//! - **ScriptedExecutor**: deterministic outcomes for tests
//! - **JsonFileStore / MemoryStore**: task persistence
//! - **DotRenderer**: Graphviz dependency graph
//! - **TracingSink / MemorySink**: diagnostic events

pub mod dot_renderer;
pub mod json_store;
pub mod matcher;
pub mod memory_store;
pub mod simulated;
pub mod sinks;

pub use self::dot_renderer::DotRenderer;
pub use self::json_store::JsonFileStore;
pub use self::matcher::{ExactTagMatcher, SubstringMatcher};
pub use self::memory_store::MemoryStore;
pub use self::simulated::{ScriptedExecutor, SimulatedExecutor};
pub use self::sinks::{MemorySink, TracingSink};
