//! Logical timestamp assignment.

use crate::ast::TimestampMap;
use crate::error::BuildError;
use crate::graph::Graph;

/// Stamp every node named in `timestamps` and check that none is left bare.
///
/// Entries for identifiers that are not in the graph are skipped with a
/// warning. Nodes that already carry a timestamp from their rule keep it
/// unless the map overrides it. Applying the same map twice leaves the graph
/// unchanged.
///
/// # Errors
///
/// Returns [`BuildError::MissingTimestamp`] listing, in graph order, every
/// node that still has no timestamp.
pub fn assign_timestamps(graph: &mut Graph, timestamps: &TimestampMap) -> Result<(), BuildError> {
    for (target, &timestamp) in timestamps {
        match graph.node_mut(target) {
            Some(node) => node.timestamp = Some(timestamp),
            None => tracing::warn!(%target, "ignoring timestamp for unknown node"),
        }
    }

    let missing: Vec<String> = graph
        .iter()
        .filter(|(_, node)| node.timestamp.is_none())
        .map(|(id, _)| id.to_owned())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(BuildError::MissingTimestamp { targets: missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Rule;
    use crate::graph::build_graph;
    use rstest::{fixture, rstest};

    #[fixture]
    fn graph() -> Graph {
        let rules = [Rule::new("app", ["a.o", "b.o"], ["link"])];
        build_graph(&rules).expect("graph")
    }

    fn stamps(entries: &[(&str, i64)]) -> TimestampMap {
        entries.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect()
    }

    #[rstest]
    fn assigns_every_node(mut graph: Graph) {
        let map = stamps(&[("app", 0), ("a.o", 0), ("b.o", 1)]);
        assign_timestamps(&mut graph, &map).expect("assign");
        assert_eq!(graph.node("b.o").and_then(|n| n.timestamp), Some(1));
    }

    #[rstest]
    fn reports_every_missing_node(mut graph: Graph) {
        let map = stamps(&[("a.o", 3)]);
        let err = assign_timestamps(&mut graph, &map).expect_err("missing");
        assert_eq!(
            err,
            BuildError::MissingTimestamp {
                targets: vec!["app".into(), "b.o".into()],
            }
        );
        assert_eq!(err.to_string(), "timestamp missing for node(s) app, b.o");
    }

    #[rstest]
    fn is_idempotent(mut graph: Graph) {
        let map = stamps(&[("app", 5), ("a.o", 2), ("b.o", 9)]);
        assign_timestamps(&mut graph, &map).expect("first");
        let first = graph.clone();
        assign_timestamps(&mut graph, &map).expect("second");
        assert_eq!(graph, first);
    }

    #[rstest]
    fn unknown_entries_are_ignored(mut graph: Graph) {
        let map = stamps(&[("app", 1), ("a.o", 1), ("b.o", 1), ("ghost", 4)]);
        assign_timestamps(&mut graph, &map).expect("assign");
        assert!(!graph.contains("ghost"));
    }

    #[rstest]
    fn rule_timestamps_count_as_assigned() {
        let rules = [
            Rule::new("app", ["src"], ["build"]).with_timestamp(2),
            Rule::new("src", Vec::<String>::new(), Vec::<String>::new()).with_timestamp(1),
        ];
        let mut graph = build_graph(&rules).expect("graph");
        assign_timestamps(&mut graph, &TimestampMap::new()).expect("assign");
        assert_eq!(graph.node("app").and_then(|n| n.timestamp), Some(2));
    }
}
