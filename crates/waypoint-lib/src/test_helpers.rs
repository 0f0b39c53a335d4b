// Test-only helpers for `waypoint-lib` unit tests.
#![allow(dead_code)]

use std::collections::BTreeSet;

use crate::map::{Node, PoiMap};

/// Builder to create `Node` instances in tests with sensible defaults.
pub struct NodeBuilder {
    node: Node,
}

impl NodeBuilder {
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            node: Node {
                id: id.to_string(),
                lat: 0.0,
                lon: 0.0,
                name: String::new(),
                categories: BTreeSet::new(),
                neighbors: Vec::new(),
            },
        }
    }

    pub fn at(mut self, lat: f64, lon: f64) -> Self {
        self.node.lat = lat;
        self.node.lon = lon;
        self
    }

    pub fn named(mut self, name: &str) -> Self {
        self.node.name = name.to_string();
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.node.categories.insert(category.to_string());
        self
    }

    pub fn neighbors(mut self, ids: &[&str]) -> Self {
        self.node.neighbors = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn build(self) -> Node {
        self.node
    }
}

/// Build a map from nodes, panicking on invalid test data.
pub fn map_from(nodes: Vec<Node>) -> PoiMap {
    PoiMap::from_nodes(nodes).expect("valid test map")
}

/// A small connected map with one unreachable outlier, shared by path and
/// region tests: 1-2-4-5-6 forms the spine, 3 a detour, 7 stands alone.
pub fn grid_map() -> PoiMap {
    map_from(vec![
        NodeBuilder::new("1")
            .named("Central Library")
            .at(34.000, -118.300)
            .neighbors(&["2", "3"])
            .build(),
        NodeBuilder::new("2")
            .named("Museum of Art")
            .at(34.003, -118.300)
            .neighbors(&["1", "4"])
            .build(),
        NodeBuilder::new("3")
            .named("Corner Coffee")
            .at(34.000, -118.294)
            .neighbors(&["1", "4"])
            .build(),
        NodeBuilder::new("4")
            .named("City Hall")
            .at(34.003, -118.295)
            .neighbors(&["2", "3", "5"])
            .build(),
        NodeBuilder::new("5")
            .named("North Market")
            .at(34.006, -118.295)
            .neighbors(&["4", "6"])
            .build(),
        NodeBuilder::new("6")
            .named("River Park")
            .at(34.009, -118.295)
            .neighbors(&["5"])
            .build(),
        NodeBuilder::new("7")
            .named("Lonely Lighthouse")
            .at(34.020, -118.270)
            .build(),
    ])
}
