//! Dependency-ordered visiting schedules (topological sort).

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::debug;

use crate::error::{Error, Result};

/// Produce a visiting order for `locations` satisfying every
/// `(prerequisite, dependent)` edge.
///
/// Kahn's algorithm over in-degree counts; the ready queue is keyed by name
/// so ties always resolve the same way. Edges naming locations outside the
/// input list are ignored. If a dependency cycle keeps any location from
/// being placed, the call fails with [`Error::IncompleteSchedule`] listing
/// the unplaced locations instead of silently returning a partial order.
pub fn topological_order(
    locations: &[String],
    dependencies: &[(String, String)],
) -> Result<Vec<String>> {
    let members: HashSet<&str> = locations.iter().map(String::as_str).collect();

    let mut in_degree: HashMap<&str, usize> =
        members.iter().map(|&name| (name, 0)).collect();
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut ignored = 0usize;

    for (prerequisite, dependent) in dependencies {
        if !members.contains(prerequisite.as_str()) || !members.contains(dependent.as_str()) {
            ignored += 1;
            continue;
        }
        *in_degree.entry(dependent.as_str()).or_insert(0) += 1;
        dependents
            .entry(prerequisite.as_str())
            .or_default()
            .push(dependent.as_str());
    }
    if ignored > 0 {
        debug!(ignored, "skipped dependency edges naming unknown locations");
    }

    let mut ready: BinaryHeap<Reverse<&str>> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(name, _)| Reverse(*name))
        .collect();

    let mut order = Vec::with_capacity(members.len());
    while let Some(Reverse(name)) = ready.pop() {
        order.push(name.to_string());
        for &next in dependents.get(name).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(next) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push(Reverse(next));
                }
            }
        }
    }

    if order.len() < members.len() {
        let placed: HashSet<&str> = order.iter().map(String::as_str).collect();
        let missing = locations
            .iter()
            .filter(|name| !placed.contains(name.as_str()))
            .cloned()
            .collect();
        return Err(Error::IncompleteSchedule { missing });
    }

    Ok(order)
}
