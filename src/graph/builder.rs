//! Rule-to-graph conversion.

use crate::ast::{Rule, WILDCARD};
use crate::error::BuildError;

use super::Graph;

/// Transform concrete rules into a [`Graph`].
///
/// Rules are applied in order. A later rule for the same target replaces the
/// recipes of an earlier one while keeping the edges already recorded. Each
/// dependency that has no rule of its own becomes a source leaf.
///
/// # Errors
///
/// Returns [`BuildError::PatternMisuse`] when a dependency contains the
/// wildcard marker. Pattern rules must be removed beforehand with
/// [`crate::pattern::PatternRuleIndex::split`].
pub fn build_graph<'a, I>(rules: I) -> Result<Graph, BuildError>
where
    I: IntoIterator<Item = &'a Rule>,
{
    let mut graph = Graph::default();
    for rule in rules {
        add_rule(&mut graph, rule)?;
    }
    tracing::debug!(nodes = graph.len(), "built dependency graph");
    Ok(graph)
}

fn add_rule(graph: &mut Graph, rule: &Rule) -> Result<(), BuildError> {
    if rule.is_pattern() {
        return Err(BuildError::PatternMisuse {
            target: rule.target.clone(),
            reason: "pattern rules cannot be added to the graph directly".into(),
        });
    }
    if let Some(dep) = rule.depends.iter().find(|dep| dep.contains(WILDCARD)) {
        return Err(BuildError::PatternMisuse {
            target: rule.target.clone(),
            reason: format!("dependency '{dep}' contains '%' in a non-pattern rule"),
        });
    }

    let node = graph.set_node(rule.target.as_str(), rule.recipes.clone());
    if rule.timestamp.is_some() {
        node.timestamp = rule.timestamp;
    }
    for dep in &rule.depends {
        graph.add_edge(dep, &rule.target);
    }
    Ok(())
}
