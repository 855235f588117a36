//! Recipe variable expansion.
//!
//! Recipes may refer to their node through three placeholders:
//!
//! - `@TARGET` expands to the node's identifier;
//! - `@DEPENDENCIES` expands to the direct prerequisites joined by spaces;
//! - `@DEP[i]` expands to the prerequisite at position `i`.
//!
//! Prerequisites are taken in the order their edges were added. A single
//! left-to-right scan performs the substitution, so text produced by one
//! placeholder is never expanded again. `@DEP[i]` with an index past the end,
//! or with something other than digits between the brackets, is kept as is.

use crate::error::BuildError;
use crate::graph::Graph;

const TARGET: &str = "@TARGET";
const DEPENDENCIES: &str = "@DEPENDENCIES";
const DEP_OPEN: &str = "@DEP[";

/// Expand placeholders in the recipes of every node.
///
/// Must run after pattern expansion so that synthesised edges are visible.
///
/// # Errors
///
/// Returns [`BuildError::UnknownTarget`] if a node disappears from the graph
/// during the pass; expansion is aborted for the whole run.
pub fn expand_variables(graph: &mut Graph) -> Result<(), BuildError> {
    let ids: Vec<String> = graph.ids().map(str::to_owned).collect();
    for id in &ids {
        expand_node(graph, id)?;
    }
    tracing::debug!(nodes = ids.len(), "expanded recipe variables");
    Ok(())
}

/// Expand placeholders in the recipes of a single node.
///
/// # Errors
///
/// Returns [`BuildError::UnknownTarget`] when `target` is not in the graph.
pub fn expand_node(graph: &mut Graph, target: &str) -> Result<(), BuildError> {
    let unknown = || BuildError::UnknownTarget {
        target: target.to_owned(),
    };
    let node = graph.node(target).ok_or_else(unknown)?;
    let deps = node.prerequisites();
    let expanded: Vec<String> = node
        .recipes
        .iter()
        .map(|recipe| substitute(recipe, target, deps))
        .collect();
    graph.node_mut(target).ok_or_else(unknown)?.recipes = expanded;
    Ok(())
}

/// Substitute placeholders in one recipe line.
///
/// ```rust
/// use tickmake::interpolate::substitute;
/// let deps = ["b.o".to_owned(), "a.o".to_owned()];
/// assert_eq!(substitute("ld -o @TARGET @DEP[1] @DEP[0]", "app", &deps), "ld -o app a.o b.o");
/// assert_eq!(substitute("ld @DEPENDENCIES", "app", &deps), "ld b.o a.o");
/// ```
#[must_use]
pub fn substitute(template: &str, target: &str, deps: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(at) = rest.find('@') {
        let (before, tail) = rest.split_at(at);
        out.push_str(before);
        let (replacement, consumed) = match_placeholder(tail, target, deps);
        if let Some(text) = replacement {
            out.push_str(&text);
            rest = tail.get(consumed..).unwrap_or_default();
        } else {
            out.push('@');
            rest = tail.get(1..).unwrap_or_default();
        }
    }
    out.push_str(rest);
    out
}

/// Recognise a placeholder at the start of `tail`.
///
/// Returns the replacement text and the number of bytes it consumes.
fn match_placeholder(tail: &str, target: &str, deps: &[String]) -> (Option<String>, usize) {
    if tail.starts_with(DEPENDENCIES) {
        return (Some(deps.join(" ")), DEPENDENCIES.len());
    }
    if tail.starts_with(TARGET) {
        return (Some(target.to_owned()), TARGET.len());
    }
    if let Some(after) = tail.strip_prefix(DEP_OPEN)
        && let Some((digits, _)) = after.split_once(']')
        && !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && let Some(dep) = digits.parse::<usize>().ok().and_then(|idx| deps.get(idx))
    {
        return (Some(dep.clone()), DEP_OPEN.len() + digits.len() + 1);
    }
    (None, 0)
}
