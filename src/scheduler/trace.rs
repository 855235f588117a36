//! Observable output of a scheduling pass.

use std::fmt::{self, Display, Formatter};

use crate::ast::Timestamp;

/// One entry in the build trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    /// The pass started at the newest timestamp in the graph.
    Start {
        /// Value of the clock when the pass began.
        time: Timestamp,
    },
    /// A stale node was rebuilt.
    Rebuild {
        /// Clock value assigned to the node.
        time: Timestamp,
        /// Identifier of the rebuilt node.
        target: String,
        /// Expanded recipe lines, never executed.
        recipes: Vec<String>,
    },
    /// The pass finished.
    End {
        /// Value of the clock after the last rebuild.
        time: Timestamp,
    },
}

/// Ordered record of one scheduling pass.
///
/// Renders as the textual build log:
///
/// ```text
/// 1: START
/// 2: app
///     link a.o b.o
/// 3: END
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildTrace {
    events: Vec<TraceEvent>,
}

impl BuildTrace {
    pub(crate) fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    /// Events in emission order.
    #[must_use]
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Identifiers of rebuilt nodes in visitation order.
    pub fn rebuilt(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|event| match event {
            TraceEvent::Rebuild { target, .. } => Some(target.as_str()),
            TraceEvent::Start { .. } | TraceEvent::End { .. } => None,
        })
    }

    /// Clock value carried by the `START` event.
    #[must_use]
    pub fn start_time(&self) -> Option<Timestamp> {
        self.events.iter().find_map(|event| match event {
            TraceEvent::Start { time } => Some(*time),
            _ => None,
        })
    }

    /// Clock value carried by the `END` event.
    #[must_use]
    pub fn end_time(&self) -> Option<Timestamp> {
        self.events.iter().rev().find_map(|event| match event {
            TraceEvent::End { time } => Some(*time),
            _ => None,
        })
    }
}

impl Display for TraceEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start { time } => write!(f, "{time}: START"),
            Self::Rebuild {
                time,
                target,
                recipes,
            } => {
                write!(f, "{time}: {target}")?;
                for recipe in recipes {
                    write!(f, "\n    {recipe}")?;
                }
                Ok(())
            }
            Self::End { time } => write!(f, "{time}: END"),
        }
    }
}

impl Display for BuildTrace {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "{event}")?;
        }
        Ok(())
    }
}
