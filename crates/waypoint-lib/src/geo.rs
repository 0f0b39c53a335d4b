//! Great-circle distance helpers shared by every search component.

use crate::error::Result;
use crate::map::{NodeId, PoiMap};

/// Earth radius used by the haversine formula, in miles.
const EARTH_RADIUS_MILES: f64 = 3961.0;

/// Great-circle distance in miles between two coordinates, in degrees.
///
/// The inner square root argument is clamped to 1 so floating rounding on
/// near-antipodal inputs can never push the arcsine out of its domain.
pub fn haversine_miles(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
    let dlat = (lat_b - lat_a).to_radians();
    let dlon = (lon_b - lon_a).to_radians();
    let p = (dlat / 2.0).sin().powi(2)
        + lat_a.to_radians().cos() * lat_b.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * p.sqrt().min(1.0).asin();
    c * EARTH_RADIUS_MILES
}

/// Distance in miles between two stored locations.
pub fn distance(map: &PoiMap, a: &str, b: &str) -> Result<f64> {
    let a = map.node(a)?;
    let b = map.node(b)?;
    Ok(haversine_miles(a.lat, a.lon, b.lat, b.lon))
}

/// Total length of a path through the given locations, in visit order.
/// Sequences shorter than two stops have length zero.
pub fn path_length(map: &PoiMap, path: &[NodeId]) -> Result<f64> {
    let mut sum = 0.0;
    for pair in path.windows(2) {
        sum += distance(map, &pair[0], &pair[1])?;
    }
    Ok(sum)
}
