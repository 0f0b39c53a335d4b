//! Region queries: bounding-box membership, subgraph extraction, and
//! leaf-peeling cycle detection on the induced subgraph.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::map::{NodeId, PoiMap};

/// Axis-aligned rectangle in geographic coordinates.
///
/// A box is well-formed iff `min_lon <= max_lon` and `min_lat <= max_lat`;
/// malformed boxes match no location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub max_lon: f64,
    pub max_lat: f64,
    pub min_lat: f64,
}

impl BoundingBox {
    /// Checked constructor that rejects malformed boxes.
    pub fn new(min_lon: f64, max_lon: f64, max_lat: f64, min_lat: f64) -> Result<Self> {
        let bbox = Self {
            min_lon,
            max_lon,
            max_lat,
            min_lat,
        };
        if !bbox.is_well_formed() {
            return Err(Error::InvalidRegion {
                min_lon,
                max_lon,
                max_lat,
                min_lat,
            });
        }
        Ok(bbox)
    }

    pub fn is_well_formed(&self) -> bool {
        self.min_lon <= self.max_lon && self.min_lat <= self.max_lat
    }

    /// Inclusive membership test. Always false for malformed boxes.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.is_well_formed()
            && lon >= self.min_lon
            && lon <= self.max_lon
            && lat >= self.min_lat
            && lat <= self.max_lat
    }
}

/// Whether the location with the given id lies inside the box.
/// Unknown ids are simply not inside any region.
pub fn in_bounding_box(map: &PoiMap, id: &str, bbox: &BoundingBox) -> bool {
    map.get(id)
        .map(|node| bbox.contains(node.lat, node.lon))
        .unwrap_or(false)
}

/// Ids of every location inside the box, in ascending-id order.
pub fn subgraph(map: &PoiMap, bbox: &BoundingBox) -> Vec<NodeId> {
    map.nodes()
        .filter(|node| bbox.contains(node.lat, node.lon))
        .map(|node| node.id.clone())
        .collect()
}

/// Detect whether the subgraph induced by the given ids contains a cycle.
///
/// Each member's degree counts only neighbor links to other members.
/// Degree-0 and degree-1 members are peeled repeatedly, decrementing the
/// degrees of the peeled member's remaining neighbors, until no such member
/// is left. Any member still holding degree 2 or more at that point sits on
/// a cycle. Every peel shrinks the remaining set, so the loop terminates.
pub fn has_cycle(map: &PoiMap, subgraph: &[NodeId]) -> bool {
    let members: HashSet<&str> = subgraph.iter().map(NodeId::as_str).collect();

    let mut degrees: HashMap<&str, usize> = HashMap::new();
    for &id in &members {
        let degree = map
            .get(id)
            .map(|node| {
                node.neighbors
                    .iter()
                    .filter(|neighbor| members.contains(neighbor.as_str()))
                    .count()
            })
            .unwrap_or(0);
        degrees.insert(id, degree);
    }

    let mut peelable: VecDeque<&str> = degrees
        .iter()
        .filter(|(_, degree)| **degree <= 1)
        .map(|(id, _)| *id)
        .collect();
    let mut removed: HashSet<&str> = HashSet::new();

    while let Some(id) = peelable.pop_front() {
        if !removed.insert(id) {
            continue;
        }
        let Some(node) = map.get(id) else {
            continue;
        };
        for neighbor in &node.neighbors {
            let neighbor = neighbor.as_str();
            if !members.contains(neighbor) || removed.contains(neighbor) {
                continue;
            }
            if let Some(degree) = degrees.get_mut(neighbor) {
                *degree = degree.saturating_sub(1);
                if *degree <= 1 {
                    peelable.push_back(neighbor);
                }
            }
        }
    }

    degrees
        .iter()
        .any(|(id, degree)| !removed.contains(*id) && *degree >= 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{map_from, NodeBuilder};

    fn triangle_map() -> PoiMap {
        map_from(vec![
            NodeBuilder::new("1").at(34.000, -118.300).neighbors(&["2", "3"]).build(),
            NodeBuilder::new("2").at(34.001, -118.300).neighbors(&["1", "3"]).build(),
            NodeBuilder::new("3").at(34.001, -118.299).neighbors(&["1", "2"]).build(),
            // Hangs off the triangle; peeled away as a leaf.
            NodeBuilder::new("4").at(34.002, -118.299).neighbors(&["3"]).build(),
        ])
    }

    #[test]
    fn malformed_box_matches_nothing() {
        let map = triangle_map();
        let bbox = BoundingBox {
            min_lon: -118.0,
            max_lon: -119.0,
            max_lat: 35.0,
            min_lat: 34.0,
        };
        assert!(!bbox.contains(34.0, -118.5));
        assert!(!in_bounding_box(&map, "1", &bbox));
        assert!(subgraph(&map, &bbox).is_empty());
    }

    #[test]
    fn checked_constructor_rejects_malformed_boxes() {
        assert!(matches!(
            BoundingBox::new(-118.0, -119.0, 35.0, 34.0),
            Err(Error::InvalidRegion { .. })
        ));
        assert!(BoundingBox::new(-119.0, -118.0, 35.0, 34.0).is_ok());
    }

    #[test]
    fn membership_is_inclusive_of_box_edges() {
        let bbox = BoundingBox {
            min_lon: -118.300,
            max_lon: -118.299,
            max_lat: 34.001,
            min_lat: 34.000,
        };
        assert!(bbox.contains(34.000, -118.300));
        assert!(bbox.contains(34.001, -118.299));
        assert!(!bbox.contains(34.0015, -118.2995));
    }

    #[test]
    fn triangle_region_has_a_cycle() {
        let map = triangle_map();
        let bbox = BoundingBox::new(-118.301, -118.298, 34.003, 33.999).unwrap();
        let members = subgraph(&map, &bbox);
        assert_eq!(members.len(), 4);
        assert!(has_cycle(&map, &members));
    }

    #[test]
    fn excluding_one_vertex_breaks_the_cycle() {
        let map = triangle_map();
        // Shrink the box so node 3 falls outside.
        let bbox = BoundingBox::new(-118.301, -118.2995, 34.003, 33.999).unwrap();
        let members = subgraph(&map, &bbox);
        assert!(members.contains(&"1".to_string()));
        assert!(members.contains(&"2".to_string()));
        assert!(!members.contains(&"3".to_string()));
        assert!(!has_cycle(&map, &members));
    }

    #[test]
    fn forest_region_has_no_cycle() {
        let map = map_from(vec![
            NodeBuilder::new("1").neighbors(&["2"]).build(),
            NodeBuilder::new("2").neighbors(&["1", "3"]).build(),
            NodeBuilder::new("3").neighbors(&["2"]).build(),
        ]);
        let members = vec!["1".to_string(), "2".to_string(), "3".to_string()];
        assert!(!has_cycle(&map, &members));
    }

    #[test]
    fn empty_subgraph_has_no_cycle() {
        let map = triangle_map();
        assert!(!has_cycle(&map, &[]));
    }
}
