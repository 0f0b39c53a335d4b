//! Waypoint library entry points.
//!
//! This crate loads a point-of-interest graph into memory and answers
//! spatial and routing queries over it: name and category lookups, fuzzy
//! matching, shortest paths, region-bounded cycle detection, bounded
//! nearest-neighbour search, multi-stop tour optimization, and
//! dependency-ordered schedules. Higher-level consumers (the CLI) should
//! only depend on the functions exported here instead of reimplementing
//! behavior.

pub mod budget;
pub mod error;
pub mod fuzzy;
pub mod geo;
pub mod ingest;
pub mod map;
pub mod nearby;
pub mod path;
pub mod region;
pub mod schedule;
pub mod tsp;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use budget::SearchBudget;
pub use error::{Error, Result};
pub use ingest::load_map;
pub use map::{Node, NodeId, PoiMap};
pub use nearby::find_nearby;
pub use path::{plan_route, PathAlgorithm, RoutePlan, RouteRequest};
pub use region::{has_cycle, in_bounding_box, subgraph, BoundingBox};
pub use schedule::topological_order;
pub use tsp::{optimize_tour, Tour, TourSearch, TourStrategy};
