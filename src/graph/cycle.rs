//! Cycle detection utilities for the dependency graph.

use std::collections::HashMap;

use crate::error::BuildError;

use super::Graph;

/// Tracks the visitation state of a node during cycle detection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum VisitState {
    Visiting,
    Visited,
}

/// Fail with [`BuildError::Cycle`] if the graph is not acyclic.
///
/// Must be called before scheduling. The reported cycle starts at its
/// lexicographically smallest node and repeats that node at the end.
///
/// # Errors
///
/// Returns [`BuildError::Cycle`] naming the first cycle found.
pub fn check_cycles(graph: &Graph) -> Result<(), BuildError> {
    match find_cycle(graph) {
        Some(cycle) => Err(BuildError::Cycle { cycle }),
        None => Ok(()),
    }
}

pub(crate) fn find_cycle(graph: &Graph) -> Option<Vec<String>> {
    let mut detector = CycleDetector::new(graph);
    for node in graph.ids() {
        if detector.is_visited(node) {
            continue;
        }
        if let Some(found) = detector.visit(node) {
            return Some(found);
        }
    }
    None
}

struct CycleDetector<'a> {
    graph: &'a Graph,
    stack: Vec<&'a str>,
    states: HashMap<&'a str, VisitState>,
}

impl<'a> CycleDetector<'a> {
    fn new(graph: &'a Graph) -> Self {
        Self {
            graph,
            stack: Vec::new(),
            states: HashMap::new(),
        }
    }

    fn is_visited(&self, node: &str) -> bool {
        matches!(self.states.get(node), Some(VisitState::Visited))
    }

    fn visit(&mut self, node: &'a str) -> Option<Vec<String>> {
        match self.states.get(node) {
            Some(VisitState::Visited) => return None,
            Some(VisitState::Visiting) => {
                let idx = self
                    .stack
                    .iter()
                    .position(|n| *n == node)
                    .unwrap_or_else(|| {
                        debug_assert!(false, "visiting node must be on the stack");
                        0
                    });
                let mut cycle: Vec<String> =
                    self.stack.iter().skip(idx).map(|n| (*n).to_owned()).collect();
                cycle.push(node.to_owned());
                return Some(canonicalize_cycle(cycle));
            }
            None => {
                self.states.insert(node, VisitState::Visiting);
            }
        }

        self.stack.push(node);
        let graph = self.graph;
        for dep in graph.prerequisites(node) {
            if let Some(cycle) = self.visit(dep) {
                return Some(cycle);
            }
        }
        self.stack.pop();
        self.states.insert(node, VisitState::Visited);
        None
    }
}

/// Rotate a closed cycle so it starts at its smallest node.
fn canonicalize_cycle(mut cycle: Vec<String>) -> Vec<String> {
    if cycle.len() < 2 {
        return cycle;
    }
    let len = cycle.len() - 1;
    let start = cycle
        .iter()
        .take(len)
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map_or(0, |(idx, _)| idx);
    let (prefix, suffix) = cycle.split_at_mut(len);
    prefix.rotate_left(start);
    if let (Some(first), Some(slot)) = (prefix.first().cloned(), suffix.first_mut()) {
        slot.clone_from(&first);
    }
    cycle
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_of(edges: &[(&str, &str)]) -> Graph {
        let mut graph = Graph::default();
        for (from, to) in edges {
            graph.add_edge(from, to);
        }
        graph
    }

    #[test]
    fn detects_self_edge_cycle() {
        let graph = graph_of(&[("a", "a")]);
        let cycle = find_cycle(&graph).expect("cycle");
        assert_eq!(cycle, ["a", "a"]);
    }

    #[test]
    fn detects_two_node_cycle() {
        let graph = graph_of(&[("b", "a"), ("a", "b")]);
        let cycle = find_cycle(&graph).expect("cycle");
        assert_eq!(cycle, ["a", "b", "a"]);
    }

    #[test]
    fn marks_nodes_visited_after_traversal() {
        let graph = graph_of(&[("b", "a")]);
        let mut detector = CycleDetector::new(&graph);
        assert!(detector.visit("a").is_none());
        assert!(detector.is_visited("a"));
        assert!(detector.is_visited("b"));
        assert!(
            detector.stack.is_empty(),
            "stack should be empty after complete traversal",
        );
    }

    #[test]
    fn diamond_is_acyclic() {
        let graph = graph_of(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]);
        assert!(check_cycles(&graph).is_ok());
    }

    #[test]
    fn check_cycles_names_the_cycle() {
        let graph = graph_of(&[("a", "b"), ("b", "c"), ("c", "a")]);
        let err = check_cycles(&graph).expect_err("cycle");
        assert_eq!(err.to_string(), "dependency graph contains a cycle: a -> c -> b -> a");
    }

    #[test]
    fn canonicalize_cycle_rotates_smallest_node() {
        let cycle = ["c", "a", "b", "c"].map(String::from).to_vec();
        assert_eq!(canonicalize_cycle(cycle), ["a", "b", "c", "a"]);
    }
}
