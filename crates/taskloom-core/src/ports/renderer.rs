//! GraphRenderer port - visualization collaborator.

use async_trait::async_trait;

use crate::board::DependencyGraph;
use crate::domain::Task;
use crate::error::RenderError;

/// GraphRenderer draws the dependency graph.
///
/// One node per task, labelled by description; one edge per dependency,
/// pointing from the dependency to the dependent task.
#[async_trait]
pub trait GraphRenderer: Send + Sync {
    async fn render(&self, tasks: &[Task], graph: &DependencyGraph) -> Result<(), RenderError>;
}
