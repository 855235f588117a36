//! Pattern rule expansion.

use crate::ast::WILDCARD;
use crate::graph::Graph;

use super::PatternRuleIndex;

/// Outcome of [`expand_patterns`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionReport {
    /// Nodes synthesised from a pattern, with the pattern that matched.
    pub expanded: Vec<(String, String)>,
    /// Rule-less leaves for which no pattern matched. They stay as source
    /// artefacts.
    pub unresolved: Vec<String>,
}

/// Split `target` into the pattern key it would match and its stem.
///
/// The key keeps everything from the final `.` onwards, so `lib/main.o`
/// yields `("%.o", "lib/main")`. Identifiers without a `.` match nothing.
///
/// ```rust
/// use tickmake::pattern::pattern_key;
/// assert_eq!(pattern_key("main.o"), Some(("%.o".to_owned(), "main")));
/// assert_eq!(pattern_key("Makefile"), None);
/// ```
#[must_use]
pub fn pattern_key(target: &str) -> Option<(String, &str)> {
    target
        .rsplit_once('.')
        .map(|(stem, suffix)| (format!("{WILDCARD}.{suffix}"), stem))
}

/// Synthesise dependencies and recipes for rule-less leaves.
///
/// Only nodes present when expansion starts are considered, in graph order.
/// A node qualifies when it has neither recipes nor prerequisites, so an
/// explicit rule always takes precedence over a pattern. Dependencies created
/// here are not expanded in turn.
pub fn expand_patterns(graph: &mut Graph, index: &PatternRuleIndex) -> ExpansionReport {
    let mut report = ExpansionReport::default();
    if index.is_empty() {
        return report;
    }

    let candidates: Vec<String> = graph
        .iter()
        .filter(|(_, node)| node.recipes.is_empty() && node.prerequisites().is_empty())
        .map(|(id, _)| id.to_owned())
        .collect();

    for target in candidates {
        let Some((key, template)) = pattern_key(&target)
            .and_then(|(key, stem)| index.get(&key).map(|rule| (key, rule.instantiate(stem))))
        else {
            tracing::debug!(%target, "no pattern rule matches; treating as source");
            report.unresolved.push(target);
            continue;
        };

        for dep in &template.depends {
            graph.add_edge(dep, &target);
        }
        graph.set_node(target.as_str(), template.recipes);
        tracing::debug!(%target, pattern = %key, "expanded pattern rule");
        report.expanded.push((target, key));
    }
    report
}
