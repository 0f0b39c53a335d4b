//! Bounded-radius top-k nearest search filtered by category tag.

use std::collections::BinaryHeap;

use crate::error::Result;
use crate::geo::haversine_miles;
use crate::map::{NodeId, PoiMap};
use crate::path::QueueEntry;

/// Find up to `k` locations carrying the category tag within `radius` miles
/// of the named origin, ordered ascending by distance.
///
/// The origin itself is always excluded, so a radius of zero returns only
/// distinct locations sharing the origin's exact coordinates. Tag matching is
/// case-sensitive; [`PoiMap::locations_by_category`] is the case-insensitive
/// surface. Fails when the origin name does not resolve.
pub fn find_nearby(
    map: &PoiMap,
    category: &str,
    origin: &str,
    radius: f64,
    k: usize,
) -> Result<Vec<NodeId>> {
    let origin_id = map.id_by_name(origin)?;
    let origin_node = map.node(&origin_id)?;

    let mut queue = BinaryHeap::new();
    for node in map.nodes() {
        if node.id == origin_id || !node.categories.contains(category) {
            continue;
        }
        let distance = haversine_miles(origin_node.lat, origin_node.lon, node.lat, node.lon);
        if distance <= radius {
            // QueueEntry reverses its ordering, so the heap pops the closest
            // candidate first.
            queue.push(QueueEntry::new(node.id.clone(), distance));
        }
    }

    let mut results = Vec::with_capacity(k.min(queue.len()));
    while results.len() < k {
        let Some(entry) = queue.pop() else {
            break;
        };
        results.push(entry.node);
    }
    Ok(results)
}
