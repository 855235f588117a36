//! Stage orchestration.
//!
//! [`BuildContext`] owns the graph and the pattern table and applies the
//! stages in their fixed order: graph construction, pattern expansion, cycle
//! check, variable expansion. Timestamps and scheduling are separate calls so
//! the front end can stop after any of them.
//!
//! ```rust
//! use tickmake::ast::{Rule, RuleSet, TimestampMap};
//! use tickmake::pipeline;
//!
//! let rules = RuleSet::from(vec![Rule::new("app", ["main.o"], ["link @DEPENDENCIES"])]);
//! let timestamps: TimestampMap = [("app".to_owned(), 0), ("main.o".to_owned(), 1)]
//!     .into_iter()
//!     .collect();
//! let trace = pipeline::run(rules, &timestamps).expect("build");
//! assert_eq!(trace.to_string(), "1: START\n2: app\n    link main.o\n3: END\n");
//! ```

use serde::Serialize;

use crate::ast::{RuleSet, TimestampMap};
use crate::error::BuildError;
use crate::graph::{Graph, build_graph, check_cycles};
use crate::interpolate::expand_variables;
use crate::pattern::{ExpansionReport, PatternRuleIndex, expand_patterns};
use crate::scheduler::{BuildTrace, schedule};
use crate::timestamps::assign_timestamps;

/// A rule set turned into an expanded, acyclic graph.
#[derive(Debug, Clone)]
pub struct BuildContext {
    graph: Graph,
    patterns: PatternRuleIndex,
    report: ExpansionReport,
}

impl BuildContext {
    /// Build the graph, expand patterns, reject cycles and substitute recipe
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::PatternMisuse`] for malformed wildcard use,
    /// [`BuildError::Cycle`] when the dependencies loop, and
    /// [`BuildError::UnknownTarget`] if variable expansion loses a node.
    pub fn from_rules(rules: RuleSet) -> Result<Self, BuildError> {
        let (patterns, concrete) = PatternRuleIndex::split(rules.into_inner())?;
        let mut graph = build_graph(&concrete)?;
        let report = expand_patterns(&mut graph, &patterns);
        check_cycles(&graph)?;
        expand_variables(&mut graph)?;
        tracing::debug!(
            expanded = report.expanded.len(),
            unresolved = report.unresolved.len(),
            "graph ready"
        );

        Ok(Self {
            graph,
            patterns,
            report,
        })
    }

    /// The expanded graph.
    #[must_use]
    pub const fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Pattern rules extracted from the rule set.
    #[must_use]
    pub const fn patterns(&self) -> &PatternRuleIndex {
        &self.patterns
    }

    /// Which nodes were synthesised from patterns and which stayed bare.
    #[must_use]
    pub const fn expansion(&self) -> &ExpansionReport {
        &self.report
    }

    /// Consume the context, yielding the graph.
    #[must_use]
    pub fn into_graph(self) -> Graph {
        self.graph
    }

    /// Stamp the graph from `timestamps`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingTimestamp`] if any node is left without a
    /// timestamp.
    pub fn apply_timestamps(&mut self, timestamps: &TimestampMap) -> Result<(), BuildError> {
        assign_timestamps(&mut self.graph, timestamps)
    }

    /// Run one simulated build pass over the stamped graph.
    ///
    /// # Errors
    ///
    /// See [`schedule`].
    pub fn schedule(&mut self) -> Result<BuildTrace, BuildError> {
        schedule(&mut self.graph)
    }

    /// One line per node: `<id>: {"recipes":[...],"timestamp":...}`.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if a node fails to serialise.
    pub fn debug_dump(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for (id, node) in self.graph.iter() {
            out.push_str(id);
            out.push_str(": ");
            out.push_str(&serde_json::to_string(node)?);
            out.push('\n');
        }
        Ok(out)
    }

    /// Pretty JSON holding the nodes, the edges and the pattern table.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if serialisation fails.
    pub fn show_json(&self) -> Result<String, serde_json::Error> {
        let dump = ShowDump {
            nodes: self
                .graph
                .iter()
                .map(|(id, node)| NodeDump {
                    id,
                    recipes: &node.recipes,
                })
                .collect(),
            edges: self
                .graph
                .edges()
                .map(|(from, to)| EdgeDump { from, to })
                .collect(),
            patterns: &self.patterns,
        };
        serde_json::to_string_pretty(&dump)
    }
}

#[derive(Serialize)]
struct ShowDump<'a> {
    nodes: Vec<NodeDump<'a>>,
    edges: Vec<EdgeDump<'a>>,
    patterns: &'a PatternRuleIndex,
}

#[derive(Serialize)]
struct NodeDump<'a> {
    id: &'a str,
    recipes: &'a [String],
}

#[derive(Serialize)]
struct EdgeDump<'a> {
    from: &'a str,
    to: &'a str,
}

/// Run every stage and return the build trace.
///
/// # Errors
///
/// Returns the first [`BuildError`] raised by any stage.
pub fn run(rules: RuleSet, timestamps: &TimestampMap) -> Result<BuildTrace, BuildError> {
    let mut ctx = BuildContext::from_rules(rules)?;
    ctx.apply_timestamps(timestamps)?;
    ctx.schedule()
}
