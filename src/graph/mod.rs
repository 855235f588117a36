//! The dependency graph shared by every pipeline stage.
//!
//! Nodes are keyed by target identifier and kept in insertion order, which is
//! also the tie-break order used by the scheduler. Each node records its
//! direct prerequisites in the order the edges were added, so `@DEP[i]` and
//! `@DEPENDENCIES` resolve by declaration order rather than alphabetically.
//!
//! # Examples
//!
//! ```
//! use tickmake::graph::Graph;
//!
//! let mut graph = Graph::default();
//! graph.set_node("app", vec!["link @DEPENDENCIES".into()]);
//! graph.add_edge("b.o", "app");
//! graph.add_edge("a.o", "app");
//! let prereqs: Vec<&str> = graph.prerequisites("app").collect();
//! assert_eq!(prereqs, ["b.o", "a.o"]);
//! ```

mod builder;
mod cycle;
mod topo;

pub use builder::build_graph;
pub use cycle::check_cycles;
pub use topo::topological_order;

use indexmap::IndexMap;
use serde::Serialize;

use crate::ast::Timestamp;

/// Attributes of a single target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Node {
    /// Recipe lines for the target.
    pub recipes: Vec<String>,
    /// Logical timestamp, absent until assigned.
    pub timestamp: Option<Timestamp>,
    #[serde(skip)]
    prerequisites: Vec<String>,
    #[serde(skip)]
    rebuilt: bool,
}

/// Lifecycle of a node across one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// No timestamp has been assigned yet.
    Unbuilt,
    /// Carries an assigned timestamp and has not been rebuilt.
    Timestamped(Timestamp),
    /// Rebuilt by the scheduler at the given time.
    Built(Timestamp),
}

impl Node {
    /// Direct prerequisites in edge insertion order.
    #[must_use]
    pub fn prerequisites(&self) -> &[String] {
        &self.prerequisites
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> NodeState {
        match (self.timestamp, self.rebuilt) {
            (None, _) => NodeState::Unbuilt,
            (Some(ts), false) => NodeState::Timestamped(ts),
            (Some(ts), true) => NodeState::Built(ts),
        }
    }

    pub(crate) fn mark_built(&mut self, at: Timestamp) {
        self.timestamp = Some(at);
        self.rebuilt = true;
    }
}

/// Directed graph whose edges point from a prerequisite to its dependent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    nodes: IndexMap<String, Node>,
}

impl Graph {
    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` names a node.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Look up a node.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Look up a node mutably.
    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Iterate over `(id, node)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.nodes.iter().map(|(id, node)| (id.as_str(), node))
    }

    /// Node identifiers in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Position of `id` in insertion order.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    /// Direct prerequisites of `id`; empty when the node does not exist.
    pub fn prerequisites<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.nodes
            .get(id)
            .map(|node| node.prerequisites.as_slice())
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
    }

    /// Every edge as `(prerequisite, dependent)`, grouped by dependent.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.nodes.iter().flat_map(|(id, node)| {
            node.prerequisites
                .iter()
                .map(move |dep| (dep.as_str(), id.as_str()))
        })
    }

    /// Create the node or replace its recipes, keeping edges and timestamp.
    pub fn set_node(&mut self, id: impl Into<String>, recipes: Vec<String>) -> &mut Node {
        let node = self.ensure_node(id);
        node.recipes = recipes;
        node
    }

    /// Return the node for `id`, creating an empty source leaf if needed.
    pub fn ensure_node(&mut self, id: impl Into<String>) -> &mut Node {
        self.nodes.entry(id.into()).or_default()
    }

    /// Add the edge `from -> to`, creating missing endpoints.
    ///
    /// Adding an edge that already exists leaves the graph unchanged.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        self.ensure_node(from);
        self.ensure_node(to);
        if let Some(node) = self.nodes.get_mut(to)
            && !node.prerequisites.iter().any(|dep| dep == from)
        {
            node.prerequisites.push(from.to_owned());
        }
    }
}
