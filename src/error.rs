//! Errors raised by the build pipeline once the rule set has been loaded.
//!
//! Every variant is fatal: the stage that detects it aborts the run and no
//! partially processed graph reaches a later stage. Configuration problems are
//! reported separately by [`crate::config::ConfigError`] because they surface
//! before a graph exists.

use itertools::Itertools;

use crate::ast::Timestamp;
use miette::Diagnostic;
use thiserror::Error;

/// Fatal pipeline errors.
#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum BuildError {
    /// The dependency graph is not acyclic.
    #[error("dependency graph contains a cycle: {}", .cycle.iter().join(" -> "))]
    #[diagnostic(
        code(tickmake::graph::cycle),
        help("remove one of the dependencies along the cycle")
    )]
    Cycle {
        /// Nodes along the cycle, starting and ending with the same node.
        cycle: Vec<String>,
    },

    /// A wildcard appeared where only concrete identifiers are allowed.
    #[error("rule '{target}' misuses the '%' wildcard: {reason}")]
    #[diagnostic(code(tickmake::pattern::misuse))]
    PatternMisuse {
        /// Target of the offending rule.
        target: String,
        /// What was wrong with the rule.
        reason: String,
    },

    /// Nodes were left without a timestamp after assignment.
    #[error("timestamp missing for node(s) {}", .targets.join(", "))]
    #[diagnostic(
        code(tickmake::timestamps::missing),
        help("add an entry to the timestamps file or a `timestamp` key to the rule")
    )]
    MissingTimestamp {
        /// Every node lacking a timestamp, in graph order.
        targets: Vec<String>,
    },

    /// A stage referenced a node that is not in the graph.
    #[error("cannot find '{target}' in graph")]
    #[diagnostic(code(tickmake::graph::unknown_target))]
    UnknownTarget {
        /// The identifier that could not be resolved.
        target: String,
    },

    /// The logical clock cannot advance past the newest timestamp.
    #[error("build clock overflows after timestamp {time}")]
    #[diagnostic(
        code(tickmake::scheduler::clock_overflow),
        help("use smaller timestamps; the clock needs one tick per rebuild plus one")
    )]
    ClockOverflow {
        /// Clock value that could not be incremented.
        time: Timestamp,
    },
}
