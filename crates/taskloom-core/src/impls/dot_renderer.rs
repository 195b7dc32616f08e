//! Graphviz DOT renderer.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::board::DependencyGraph;
use crate::domain::{Task, TaskStatus};
use crate::error::RenderError;
use crate::ports::GraphRenderer;

/// Writes the dependency graph as DOT text to a file.
#[derive(Debug, Clone)]
pub struct DotRenderer {
    path: PathBuf,
}

impl DotRenderer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

fn fill(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "white",
        TaskStatus::Assigned => "lightblue",
        TaskStatus::Completed => "palegreen",
        TaskStatus::Error => "salmon",
    }
}

/// DOT source: one node per task, one edge per dependency (dependency ->
/// dependent).
pub fn to_dot(tasks: &[Task], graph: &DependencyGraph) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "digraph tasks {{")?;
    writeln!(out, "    node [shape=box, style=filled];")?;
    for task in tasks {
        writeln!(
            out,
            "    \"{}\" [label=\"{}\", fillcolor={}];",
            task.id.get(),
            escape(&task.description),
            fill(task.status),
        )?;
    }
    for (dep, dependent) in graph.edges() {
        writeln!(out, "    \"{}\" -> \"{}\";", dep.get(), dependent.get())?;
    }
    writeln!(out, "}}")?;
    Ok(out)
}

#[async_trait]
impl GraphRenderer for DotRenderer {
    async fn render(&self, tasks: &[Task], graph: &DependencyGraph) -> Result<(), RenderError> {
        let dot = to_dot(tasks, graph)?;
        tokio::fs::write(&self.path, dot).await?;
        tracing::debug!(path = %self.path.display(), "dependency graph rendered");
        Ok(())
    }
}
