//! Dependency graph over a task snapshot.
//!
//! Design:
//! - Forward edges: task -> 依存先 (待っている相手)
//! - Reverse edges: task -> 依存元 (待っている側)
//! - Invariant: edges と reverse_edges は常に同期
//!
//! The board never consults this graph for readiness (readiness reads
//! completion flags directly). It is built for rendering and for the
//! start-up cycle report.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{Task, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// task -> tasks it depends on
    edges: BTreeMap<TaskId, BTreeSet<TaskId>>,

    /// task -> tasks waiting for it
    reverse_edges: BTreeMap<TaskId, BTreeSet<TaskId>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut graph = Self::new();
        for task in tasks {
            for dep in &task.dependencies {
                graph.add_dependency(task.id, *dep);
            }
        }
        graph
    }

    /// `task` depends on `depends_on`.
    pub fn add_dependency(&mut self, task: TaskId, depends_on: TaskId) {
        self.edges.entry(task).or_default().insert(depends_on);
        self.reverse_edges.entry(depends_on).or_default().insert(task);
    }

    pub fn has_dependencies(&self, task: TaskId) -> bool {
        self.edges.get(&task).is_some_and(|deps| !deps.is_empty())
    }

    pub fn dependencies_of(&self, task: TaskId) -> Vec<TaskId> {
        self.edges
            .get(&task)
            .map(|deps| deps.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Tasks that wait for `task`.
    pub fn dependents_of(&self, task: TaskId) -> Vec<TaskId> {
        self.reverse_edges
            .get(&task)
            .map(|waiting| waiting.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Every edge as `(dependency, dependent)`, ordered by dependency id.
    pub fn edges(&self) -> Vec<(TaskId, TaskId)> {
        self.reverse_edges
            .iter()
            .flat_map(|(dep, dependents)| dependents.iter().map(move |d| (*dep, *d)))
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    /// First cycle found, as a path that starts and ends on the same task.
    pub fn detect_cycle(&self) -> Option<Vec<TaskId>> {
        let mut marks: BTreeMap<TaskId, Mark> = BTreeMap::new();
        let mut path = Vec::new();
        for &start in self.edges.keys() {
            if marks.contains_key(&start) {
                continue;
            }
            if let Some(cycle) = self.visit(start, &mut marks, &mut path) {
                return Some(cycle);
            }
        }
        None
    }

    fn visit(
        &self,
        node: TaskId,
        marks: &mut BTreeMap<TaskId, Mark>,
        path: &mut Vec<TaskId>,
    ) -> Option<Vec<TaskId>> {
        marks.insert(node, Mark::InProgress);
        path.push(node);

        if let Some(deps) = self.edges.get(&node) {
            for &dep in deps {
                match marks.get(&dep) {
                    Some(Mark::InProgress) => {
                        let start = path.iter().position(|id| *id == dep).unwrap_or(0);
                        let mut cycle = path[start..].to_vec();
                        cycle.push(dep);
                        return Some(cycle);
                    }
                    Some(Mark::Done) => {}
                    None => {
                        if let Some(cycle) = self.visit(dep, marks, path) {
                            return Some(cycle);
                        }
                    }
                }
            }
        }

        path.pop();
        marks.insert(node, Mark::Done);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u64) -> TaskId {
        TaskId::new(n)
    }

    #[test]
    fn empty_graph_has_no_dependencies() {
        let graph = DependencyGraph::new();
        assert!(!graph.has_dependencies(id(1)));
        assert!(graph.edges().is_empty());
        assert!(graph.detect_cycle().is_none());
    }

    #[test]
    fn edges_are_recorded_both_ways() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency(id(3), id(1));

        assert!(graph.has_dependencies(id(3)));
        assert!(!graph.has_dependencies(id(1)));
        assert_eq!(graph.dependencies_of(id(3)), vec![id(1)]);
        assert_eq!(graph.dependents_of(id(1)), vec![id(3)]);
    }

    #[test]
    fn edges_point_from_dependency_to_dependent() {
        let tasks = vec![
            Task::new(1, "analyze data", 1),
            Task::new(2, "automation", 1),
            Task::new(3, "market research", 2).depends_on(1),
            Task::new(4, "code review", 2).depends_on(2),
        ];
        let graph = DependencyGraph::from_tasks(&tasks);
        assert_eq!(graph.edges(), vec![(id(1), id(3)), (id(2), id(4))]);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn detects_two_node_cycle() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency(id(1), id(2));
        graph.add_dependency(id(2), id(1));

        let cycle = graph.detect_cycle().expect("cycle");
        assert_eq!(cycle.first(), cycle.last());
        assert!(cycle.len() >= 3);
    }

    #[test]
    fn detects_self_dependency() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency(id(1), id(1));
        assert_eq!(graph.detect_cycle(), Some(vec![id(1), id(1)]));
    }

    #[test]
    fn detects_cycle_behind_a_chain() {
        // 1 <- 2 <- 3 <- 4 <- 2
        let mut graph = DependencyGraph::new();
        graph.add_dependency(id(2), id(1));
        graph.add_dependency(id(3), id(2));
        graph.add_dependency(id(4), id(3));
        graph.add_dependency(id(2), id(4));

        let cycle = graph.detect_cycle().expect("cycle");
        assert!(!cycle.contains(&id(1)));
        assert_eq!(cycle.first(), cycle.last());
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency(id(2), id(1));
        graph.add_dependency(id(3), id(1));
        graph.add_dependency(id(4), id(2));
        graph.add_dependency(id(4), id(3));
        graph.add_dependency(id(4), id(1));

        assert!(graph.detect_cycle().is_none());
    }
}
