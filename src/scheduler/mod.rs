//! Incremental build simulation.
//!
//! The scheduler walks the graph in topological order against a logical
//! clock. The clock starts one tick after the newest timestamp in the graph
//! and advances by one for every rebuilt node, so each rebuild gets a
//! timestamp strictly newer than everything before it.
//!
//! A node is stale when at least one direct prerequisite is *as new or newer*
//! than the node itself. Ties rebuild: this keeps staleness propagating
//! deterministically from one pass to the next, and differs from tools that
//! compare with a strict `>`.

mod trace;

pub use trace::{BuildTrace, TraceEvent};

use crate::ast::Timestamp;
use crate::error::BuildError;
use crate::graph::{Graph, topological_order};

/// Simulate one build pass, mutating the timestamps of rebuilt nodes.
///
/// # Errors
///
/// Returns [`BuildError::Cycle`] if the graph has no topological order and
/// [`BuildError::MissingTimestamp`] if any node reaches the scheduler without
/// a timestamp. Returns [`BuildError::ClockOverflow`] if the clock would
/// run past [`Timestamp::MAX`].
pub fn schedule(graph: &mut Graph) -> Result<BuildTrace, BuildError> {
    let order = topological_order(graph)?;
    let start_time = newest_timestamp(graph)?;

    let mut trace = BuildTrace::default();
    trace.push(TraceEvent::Start { time: start_time });
    tracing::debug!(start_time, "build pass started");

    let mut current_time = tick(start_time)?;
    for target in order {
        if !is_stale(graph, &target)? {
            continue;
        }
        let node = graph
            .node_mut(&target)
            .ok_or_else(|| BuildError::UnknownTarget {
                target: target.clone(),
            })?;
        node.mark_built(current_time);
        tracing::info!(%target, time = current_time, "rebuilding stale target");
        trace.push(TraceEvent::Rebuild {
            time: current_time,
            recipes: node.recipes.clone(),
            target,
        });
        current_time = tick(current_time)?;
    }

    trace.push(TraceEvent::End { time: current_time });
    tracing::debug!(end_time = current_time, "build pass finished");
    Ok(trace)
}

fn tick(time: Timestamp) -> Result<Timestamp, BuildError> {
    time.checked_add(1).ok_or(BuildError::ClockOverflow { time })
}

/// Newest timestamp in the graph, or zero when the graph is empty.
fn newest_timestamp(graph: &Graph) -> Result<Timestamp, BuildError> {
    let mut newest: Option<Timestamp> = None;
    for (id, _) in graph.iter() {
        let ts = timestamp_of(graph, id)?;
        newest = Some(newest.map_or(ts, |n| n.max(ts)));
    }
    Ok(newest.unwrap_or_default())
}

/// Whether any direct prerequisite is at least as new as `target`.
///
/// # Errors
///
/// Returns [`BuildError::MissingTimestamp`] if `target` or one of its
/// prerequisites lacks a timestamp.
pub fn is_stale(graph: &Graph, target: &str) -> Result<bool, BuildError> {
    let own = timestamp_of(graph, target)?;
    for dep in graph.prerequisites(target) {
        if timestamp_of(graph, dep)? >= own {
            return Ok(true);
        }
    }
    Ok(false)
}

fn timestamp_of(graph: &Graph, id: &str) -> Result<Timestamp, BuildError> {
    graph
        .node(id)
        .ok_or_else(|| BuildError::UnknownTarget {
            target: id.to_owned(),
        })?
        .timestamp
        .ok_or_else(|| BuildError::MissingTimestamp {
            targets: vec![id.to_owned()],
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeState;
    use insta::assert_snapshot;
    use rstest::rstest;

    fn stamped(edges: &[(&str, &str)], stamps: &[(&str, Timestamp)]) -> Graph {
        let mut graph = Graph::default();
        for (from, to) in edges {
            graph.add_edge(from, to);
        }
        for (id, ts) in stamps {
            graph.ensure_node(*id).timestamp = Some(*ts);
        }
        graph
    }

    #[rstest]
    fn strictly_older_prerequisites_are_fresh() {
        let mut graph = stamped(&[("src", "out")], &[("src", 1), ("out", 2)]);
        let trace = schedule(&mut graph).expect("schedule");
        assert_eq!(trace.rebuilt().count(), 0);
        assert_eq!(
            graph.node("out").map(crate::graph::Node::state),
            Some(NodeState::Timestamped(2))
        );
        assert_snapshot!(trace.to_string().trim_end(), @r"
        2: START
        3: END
        ");
    }

    #[rstest]
    #[case(2, 2)]
    #[case(3, 2)]
    fn equal_or_newer_prerequisite_forces_rebuild(#[case] src: Timestamp, #[case] out: Timestamp) {
        let mut graph = stamped(&[("src", "out")], &[("src", src), ("out", out)]);
        let trace = schedule(&mut graph).expect("schedule");
        let rebuilt: Vec<&str> = trace.rebuilt().collect();
        assert_eq!(rebuilt, ["out"]);
        let ts = graph.node("out").and_then(|n| n.timestamp).expect("ts");
        assert!(ts > src.max(out));
    }

    #[rstest]
    fn staleness_propagates_down_the_chain() {
        let mut graph = stamped(
            &[("a", "b"), ("b", "c")],
            &[("a", 5), ("b", 6), ("c", 7)],
        );
        graph.node_mut("a").expect("a").timestamp = Some(6);
        let trace = schedule(&mut graph).expect("schedule");
        let rebuilt: Vec<&str> = trace.rebuilt().collect();
        assert_eq!(rebuilt, ["b", "c"]);
        assert_eq!(graph.node("b").and_then(|n| n.timestamp), Some(8));
        assert_eq!(graph.node("c").and_then(|n| n.timestamp), Some(9));
        assert_eq!(trace.end_time(), Some(10));
    }

    #[rstest]
    fn rebuild_emits_recipes() {
        let mut graph = stamped(&[("a.o", "app"), ("b.o", "app")], &[]);
        graph.set_node("app", vec!["link a.o b.o".into()]);
        for (id, ts) in [("app", 0), ("a.o", 0), ("b.o", 1)] {
            graph.ensure_node(id).timestamp = Some(ts);
        }
        let trace = schedule(&mut graph).expect("schedule");
        assert_eq!(trace.start_time(), Some(1));
        assert_eq!(
            graph.node("app").map(crate::graph::Node::state),
            Some(NodeState::Built(2))
        );
        assert_snapshot!(trace.to_string().trim_end(), @r"
        1: START
        2: app
            link a.o b.o
        3: END
        ");
    }

    #[rstest]
    fn missing_timestamp_is_rejected() {
        let mut graph = stamped(&[("src", "out")], &[("out", 1)]);
        let err = schedule(&mut graph).expect_err("missing");
        assert_eq!(
            err,
            BuildError::MissingTimestamp {
                targets: vec!["src".into()],
            }
        );
    }

    #[rstest]
    #[case(Timestamp::MAX, Timestamp::MAX)]
    #[case(Timestamp::MAX, 0)]
    fn clock_overflow_is_an_error(#[case] src: Timestamp, #[case] app: Timestamp) {
        let mut graph = stamped(&[("src", "app")], &[("app", app), ("src", src)]);
        let err = schedule(&mut graph).expect_err("overflow");
        assert_eq!(err, BuildError::ClockOverflow { time: Timestamp::MAX });
    }

    #[rstest]
    fn last_rebuild_may_take_the_maximum() {
        let mut graph = stamped(&[("src", "app")], &[("app", 5), ("src", Timestamp::MAX - 1)]);
        let err = schedule(&mut graph).expect_err("end tick overflows");
        assert_eq!(err, BuildError::ClockOverflow { time: Timestamp::MAX });
        assert_eq!(
            graph.node("app").map(crate::graph::Node::state),
            Some(NodeState::Built(Timestamp::MAX))
        );
    }

    #[rstest]
    fn empty_graph_starts_at_zero() {
        let mut graph = Graph::default();
        let trace = schedule(&mut graph).expect("schedule");
        assert_eq!(
            trace.events(),
            [TraceEvent::Start { time: 0 }, TraceEvent::End { time: 1 }]
        );
    }
}
