//! Diagnostic event sinks.

use std::sync::{Mutex, PoisonError};

use crate::domain::{DiagnosticEvent, EventLevel};
use crate::ports::EventSink;

/// Forwards events to `tracing`, with the task id as a structured field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: DiagnosticEvent) {
        let task_id = event.task_id.map(|id| id.to_string());
        let task_id = task_id.as_deref().unwrap_or("-");
        match event.level {
            EventLevel::Info => tracing::info!(task_id, "{}", event.message),
            EventLevel::Warning => tracing::warn!(task_id, "{}", event.message),
            EventLevel::Error => tracing::error!(task_id, "{}", event.message),
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Events at `level` whose message contains `needle`.
    pub fn count(&self, level: EventLevel, needle: &str) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| e.level == level && e.message.contains(needle))
            .count()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: DiagnosticEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
