//! Shortest-path search over the point-of-interest graph.
//!
//! Two algorithms are provided with different trade-offs: Dijkstra with a
//! min-priority queue and early goal termination, and Bellman-Ford with
//! round-based edge relaxation and an early exit once a round changes
//! nothing. For reachable goals over non-negative weights both return a
//! path of the same total length.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::budget::{BudgetMeter, SearchBudget};
use crate::error::{Error, Result};
use crate::geo::{self, haversine_miles};
use crate::map::{NodeId, PoiMap};

/// Supported shortest-path algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PathAlgorithm {
    #[default]
    Dijkstra,
    BellmanFord,
}

impl fmt::Display for PathAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            PathAlgorithm::Dijkstra => "dijkstra",
            PathAlgorithm::BellmanFord => "bellman-ford",
        };
        f.write_str(value)
    }
}

/// High-level route planning request between two location names.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub start: String,
    pub goal: String,
    pub algorithm: PathAlgorithm,
    pub budget: SearchBudget,
}

impl RouteRequest {
    /// Convenience constructor for a Dijkstra route with no budget.
    pub fn dijkstra(start: impl Into<String>, goal: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            goal: goal.into(),
            algorithm: PathAlgorithm::Dijkstra,
            budget: SearchBudget::unlimited(),
        }
    }

    /// Convenience constructor for a Bellman-Ford route with no budget.
    pub fn bellman_ford(start: impl Into<String>, goal: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            goal: goal.into(),
            algorithm: PathAlgorithm::BellmanFord,
            budget: SearchBudget::unlimited(),
        }
    }
}

/// Planned route returned by the library.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePlan {
    pub algorithm: PathAlgorithm,
    pub steps: Vec<NodeId>,
    /// Total geodesic length of the route in miles.
    pub length: f64,
}

impl RoutePlan {
    /// Number of hops in the route.
    pub fn hop_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}

/// Compute a route using the requested algorithm.
///
/// Resolves both location names (failing with suggestions for typos), runs
/// the search, and fails with [`Error::RouteNotFound`] when the goal is
/// unreachable.
pub fn plan_route(map: &PoiMap, request: &RouteRequest) -> Result<RoutePlan> {
    let start_id = map.id_by_name(&request.start)?;
    let goal_id = map.id_by_name(&request.goal)?;

    let steps = match request.algorithm {
        PathAlgorithm::Dijkstra => find_path_dijkstra(map, &start_id, &goal_id),
        PathAlgorithm::BellmanFord => {
            let mut meter = request.budget.meter();
            find_path_bellman_ford(map, &start_id, &goal_id, &mut meter)?
        }
    };

    let steps = steps.ok_or_else(|| Error::RouteNotFound {
        start: request.start.clone(),
        goal: request.goal.clone(),
    })?;

    let length = geo::path_length(map, &steps)?;
    debug!(
        algorithm = %request.algorithm,
        hops = steps.len().saturating_sub(1),
        length,
        "planned route"
    );

    Ok(RoutePlan {
        algorithm: request.algorithm,
        steps,
        length,
    })
}

/// Run Dijkstra's algorithm between two location ids.
///
/// The queue is keyed by cumulative distance and the search terminates as
/// soon as the goal is popped as the queue minimum. Returns `None` when the
/// goal is unreachable or either id is unknown.
pub fn find_path_dijkstra(map: &PoiMap, start: &str, goal: &str) -> Option<Vec<NodeId>> {
    if !map.contains(start) || !map.contains(goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start.to_string()]);
    }

    let mut distances: HashMap<NodeId, f64> = HashMap::new();
    let mut parents: HashMap<NodeId, Option<NodeId>> = HashMap::new();
    let mut queue = BinaryHeap::new();

    distances.insert(start.to_string(), 0.0);
    parents.insert(start.to_string(), None);
    queue.push(QueueEntry::new(start.to_string(), 0.0));

    while let Some(entry) = queue.pop() {
        let best = match distances.get(&entry.node) {
            Some(distance) if entry.cost.0 > *distance => continue, // stale entry
            Some(distance) => *distance,
            None => continue,
        };

        if entry.node == goal {
            return Some(reconstruct_path(&parents, start, goal));
        }

        let Some(node) = map.get(&entry.node) else {
            continue;
        };
        for next_id in &node.neighbors {
            let Some(next) = map.get(next_id) else {
                continue;
            };
            let next_cost = best + haversine_miles(node.lat, node.lon, next.lat, next.lon);
            if next_cost < *distances.get(next_id).unwrap_or(&f64::INFINITY) {
                distances.insert(next_id.clone(), next_cost);
                parents.insert(next_id.clone(), Some(entry.node.clone()));
                queue.push(QueueEntry::new(next_id.clone(), next_cost));
            }
        }
    }

    None
}

/// Run Bellman-Ford between two location ids.
///
/// Relaxes every edge for up to node-count rounds, exiting early the first
/// round in which no distance improves. The path is rebuilt by following
/// predecessor links back from the goal. The budget meter is ticked once per
/// round plus once per relaxed edge.
pub fn find_path_bellman_ford(
    map: &PoiMap,
    start: &str,
    goal: &str,
    meter: &mut BudgetMeter,
) -> Result<Option<Vec<NodeId>>> {
    if !map.contains(start) || !map.contains(goal) {
        return Ok(None);
    }
    if start == goal {
        return Ok(Some(vec![start.to_string()]));
    }

    let mut distances: HashMap<&str, f64> = HashMap::new();
    let mut predecessors: HashMap<&str, &str> = HashMap::new();
    distances.insert(start, 0.0);

    for _round in 0..map.len() {
        meter.tick()?;
        let mut relaxed = false;

        for node in map.nodes() {
            let Some(&from_cost) = distances.get(node.id.as_str()) else {
                continue;
            };
            for next_id in &node.neighbors {
                meter.tick()?;
                let Some(next) = map.get(next_id) else {
                    continue;
                };
                let candidate =
                    from_cost + haversine_miles(node.lat, node.lon, next.lat, next.lon);
                if candidate < *distances.get(next_id.as_str()).unwrap_or(&f64::INFINITY) {
                    distances.insert(next_id.as_str(), candidate);
                    predecessors.insert(next_id.as_str(), node.id.as_str());
                    relaxed = true;
                }
            }
        }

        if !relaxed {
            break;
        }
    }

    if !predecessors.contains_key(goal) {
        return Ok(None);
    }

    let mut path = vec![goal.to_string()];
    let mut current = goal;
    while current != start {
        let Some(&previous) = predecessors.get(current) else {
            return Ok(None);
        };
        path.push(previous.to_string());
        current = previous;
    }
    path.reverse();
    Ok(Some(path))
}

fn reconstruct_path(
    parents: &HashMap<NodeId, Option<NodeId>>,
    start: &str,
    goal: &str,
) -> Vec<NodeId> {
    let mut path = Vec::new();
    let mut current = Some(goal.to_string());
    while let Some(node) = current {
        path.push(node.clone());
        if node == start {
            break;
        }
        current = parents.get(&node).cloned().flatten();
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct FloatOrd(pub(crate) f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Heap entry ordered so `BinaryHeap` becomes a min-heap by cost, with the
/// node id as a deterministic tie-break.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct QueueEntry {
    pub(crate) node: NodeId,
    pub(crate) cost: FloatOrd,
}

impl QueueEntry {
    pub(crate) fn new(node: NodeId, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
