//! Deterministic topological ordering.
//!
//! Kahn's algorithm over node insertion indices. Whenever several nodes are
//! ready at once, the one inserted into the graph earliest is emitted first,
//! so the same rule set always produces the same order.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::BuildError;

use super::{Graph, cycle};

/// Order every node after all of its prerequisites.
///
/// # Errors
///
/// Returns [`BuildError::Cycle`] when no order exists.
pub fn topological_order(graph: &Graph) -> Result<Vec<String>, BuildError> {
    let count = graph.len();
    let mut in_degree = vec![0usize; count];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];

    for (from, to) in graph.edges() {
        let (Some(src), Some(dst)) = (graph.index_of(from), graph.index_of(to)) else {
            return Err(BuildError::UnknownTarget {
                target: from.to_owned(),
            });
        };
        if let (Some(list), Some(degree)) = (dependents.get_mut(src), in_degree.get_mut(dst)) {
            list.push(dst);
            *degree += 1;
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(idx, _)| Reverse(idx))
        .collect();
    let mut order = Vec::with_capacity(count);

    while let Some(Reverse(idx)) = ready.pop() {
        order.push(idx);
        for &next in dependents.get(idx).map(Vec::as_slice).unwrap_or_default() {
            if let Some(degree) = in_degree.get_mut(next) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push(Reverse(next));
                }
            }
        }
    }

    if order.len() < count {
        let cycle = cycle::find_cycle(graph).unwrap_or_default();
        return Err(BuildError::Cycle { cycle });
    }

    let ids: Vec<&str> = graph.ids().collect();
    Ok(order
        .into_iter()
        .filter_map(|idx| ids.get(idx).map(|id| (*id).to_owned()))
        .collect())
}
