//! CSV ingestion for the point-of-interest graph and scheduler inputs.
//!
//! The point source is tabular: `id, lat, lon, name`, then a variable-length
//! tail where tokens starting with a letter are category tags and tokens
//! starting with a digit are neighbor ids. Stray quotes and braces left over
//! from upstream exports are stripped from every field.

use std::collections::BTreeSet;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{info, warn};

use crate::error::Result;
use crate::map::{Node, PoiMap};

/// Load the point-of-interest map from a CSV file.
///
/// Rows missing the four leading fields or carrying unparseable coordinates
/// are skipped with a warning; they do not abort the load. Neighbor
/// references that never resolve are dropped by [`PoiMap::from_nodes`].
pub fn load_map(path: &Path) -> Result<PoiMap> {
    let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;

    let mut nodes = Vec::new();
    let mut skipped = 0usize;
    for record in reader.records() {
        let record = record?;
        match parse_node(&record) {
            Some(node) => nodes.push(node),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(skipped, "ignored malformed point-of-interest rows");
    }
    info!(
        count = nodes.len(),
        path = %path.display(),
        "loaded point-of-interest data"
    );

    PoiMap::from_nodes(nodes)
}

/// Read the location names consumed by the scheduler, one or more per row.
pub fn read_locations(path: &Path) -> Result<Vec<String>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;

    let mut locations = Vec::new();
    for record in reader.records() {
        let record = record?;
        for field in record.iter() {
            let name = clean(field);
            if !name.is_empty() {
                locations.push(name);
            }
        }
    }
    Ok(locations)
}

/// Read dependency edges for the scheduler. Each row is a precedence chain:
/// consecutive fields form `(prerequisite, dependent)` pairs.
pub fn read_dependencies(path: &Path) -> Result<Vec<(String, String)>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;

    let mut edges = Vec::new();
    for record in reader.records() {
        let record = record?;
        let chain: Vec<String> = record
            .iter()
            .map(clean)
            .filter(|name| !name.is_empty())
            .collect();
        for pair in chain.windows(2) {
            edges.push((pair[0].clone(), pair[1].clone()));
        }
    }
    Ok(edges)
}

fn parse_node(record: &csv::StringRecord) -> Option<Node> {
    if record.len() < 4 {
        return None;
    }

    let id = clean(record.get(0)?);
    let lat: f64 = clean(record.get(1)?).parse().ok()?;
    let lon: f64 = clean(record.get(2)?).parse().ok()?;
    let name = clean(record.get(3)?);
    if id.is_empty() {
        return None;
    }

    let mut categories = BTreeSet::new();
    let mut neighbors = Vec::new();
    for raw in record.iter().skip(4) {
        let token = clean(raw);
        match token.chars().next() {
            Some(c) if c.is_ascii_alphabetic() => {
                categories.insert(token);
            }
            Some(c) if c.is_ascii_digit() => neighbors.push(token),
            _ => {}
        }
    }

    Some(Node {
        id,
        lat,
        lon,
        name,
        categories,
        neighbors,
    })
}

fn clean(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '\'' | '"' | '{' | '}'))
        .collect::<String>()
        .trim()
        .to_string()
}
