use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use serde::Serialize;
use tracing::warn;

use crate::error::{Error, Result};
use crate::fuzzy;

/// String identifier for a point of interest.
pub type NodeId = String;

/// A point of interest with coordinates, display name, category tags, and
/// directed neighbor links.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
    /// Display name. Not guaranteed unique, and may be empty for unnamed
    /// intersections.
    pub name: String,
    pub categories: BTreeSet<String>,
    /// Directed edges: `id -> n` exists iff `n` appears here.
    pub neighbors: Vec<NodeId>,
}

/// In-memory point-of-interest graph, immutable after construction.
///
/// Nodes are keyed in a `BTreeMap` so every whole-map scan (autocomplete,
/// closest-name search, duplicate-name tie-breaks) runs in ascending-id order
/// and is deterministic across processes.
#[derive(Debug, Clone, Default)]
pub struct PoiMap {
    nodes: BTreeMap<NodeId, Node>,
}

impl PoiMap {
    /// Build a map from a collection of nodes.
    ///
    /// Duplicate ids are rejected. Neighbor references to ids that are not
    /// part of the collection are dropped with a warning, so every edge in
    /// the resulting map resolves to a stored node.
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Result<Self> {
        let mut stored: BTreeMap<NodeId, Node> = BTreeMap::new();
        for node in nodes {
            if stored.contains_key(&node.id) {
                return Err(Error::DuplicateId { id: node.id });
            }
            stored.insert(node.id.clone(), node);
        }

        let known: BTreeSet<NodeId> = stored.keys().cloned().collect();
        let mut dropped = 0usize;
        for node in stored.values_mut() {
            let before = node.neighbors.len();
            node.neighbors.retain(|id| known.contains(id));
            dropped += before - node.neighbors.len();
        }
        if dropped > 0 {
            warn!(dropped, "ignored neighbor references to unknown locations");
        }

        Ok(Self { nodes: stored })
    }

    /// Number of stored locations.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the map holds no locations.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if the id exists in the map.
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Lookup a node by id.
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Lookup a node by id, failing with [`Error::UnknownId`] if absent.
    pub fn node(&self, id: &str) -> Result<&Node> {
        self.nodes.get(id).ok_or_else(|| Error::UnknownId {
            id: id.to_string(),
        })
    }

    /// Iterate all nodes in ascending-id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Latitude of a location in degrees.
    pub fn latitude(&self, id: &str) -> Result<f64> {
        Ok(self.node(id)?.lat)
    }

    /// Longitude of a location in degrees.
    pub fn longitude(&self, id: &str) -> Result<f64> {
        Ok(self.node(id)?.lon)
    }

    /// Display name of a location.
    pub fn name(&self, id: &str) -> Result<&str> {
        Ok(self.node(id)?.name.as_str())
    }

    /// Directed neighbor ids of a location.
    pub fn neighbor_ids(&self, id: &str) -> Result<&[NodeId]> {
        Ok(self.node(id)?.neighbors.as_slice())
    }

    /// Resolve a display name to an id using an exact, case-sensitive match.
    ///
    /// Names are not unique; when several locations share one, the lowest id
    /// wins. Unknown names fail with [`Error::UnknownLocation`] carrying
    /// near-miss suggestions.
    pub fn id_by_name(&self, name: &str) -> Result<NodeId> {
        self.nodes()
            .find(|node| node.name == name)
            .map(|node| node.id.clone())
            .ok_or_else(|| self.unknown_location(name))
    }

    /// Resolve a display name to its `(lat, lon)` position.
    pub fn position_by_name(&self, name: &str) -> Result<(f64, f64)> {
        let id = self.id_by_name(name)?;
        let node = self.node(&id)?;
        Ok((node.lat, node.lon))
    }

    /// All display names with the given case-insensitive prefix, in
    /// ascending-id order.
    pub fn autocomplete(&self, prefix: &str) -> Vec<String> {
        let prefix = prefix.to_lowercase();
        self.nodes()
            .filter(|node| node.name.to_lowercase().starts_with(&prefix))
            .map(|node| node.name.clone())
            .collect()
    }

    /// Every distinct category tag across all locations, sorted.
    pub fn all_categories(&self) -> Vec<String> {
        let mut categories = BTreeSet::new();
        for node in self.nodes() {
            for category in &node.categories {
                categories.insert(category.clone());
            }
        }
        categories.into_iter().collect()
    }

    /// Positions of every location carrying the category tag,
    /// case-insensitively. Empty if no location matches.
    pub fn locations_by_category(&self, category: &str) -> Vec<(f64, f64)> {
        self.nodes()
            .filter(|node| {
                node.categories
                    .iter()
                    .any(|tag| tag.eq_ignore_ascii_case(category))
            })
            .map(|node| (node.lat, node.lon))
            .collect()
    }

    /// Positions of every location whose full display name matches the
    /// regular expression. The pattern must compile, and matching is
    /// case-sensitive over the entire name (not a substring search).
    pub fn locations_by_name_pattern(&self, pattern: &str) -> Result<Vec<(f64, f64)>> {
        let anchored = format!(r"\A(?:{pattern})\z");
        let regex = Regex::new(&anchored).map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            message: source.to_string(),
        })?;

        Ok(self
            .nodes()
            .filter(|node| regex.is_match(&node.name))
            .map(|node| (node.lat, node.lon))
            .collect())
    }

    pub(crate) fn unknown_location(&self, name: &str) -> Error {
        Error::UnknownLocation {
            name: name.to_string(),
            suggestions: fuzzy::suggestions(self, name, 3),
        }
    }
}
