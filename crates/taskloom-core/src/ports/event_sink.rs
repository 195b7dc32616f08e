//! EventSink port - diagnostics collaborator.

use crate::domain::DiagnosticEvent;

/// EventSink records diagnostic events.
///
/// Emitting is synchronous and infallible from the caller's point of view:
/// a sink that cannot deliver an event drops it.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: DiagnosticEvent);
}
