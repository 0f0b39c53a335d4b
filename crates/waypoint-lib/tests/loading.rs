mod common;

use std::io::Write;

use waypoint_lib::ingest::{read_dependencies, read_locations};
use waypoint_lib::load_map;

use common::fixture_path;

fn write_csv(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write csv");
    file
}

#[test]
fn fixture_nodes_carry_names_tags_and_edges() {
    let map = load_map(&fixture_path()).unwrap();

    let library = map.node("1").unwrap();
    assert_eq!(library.name, "Central Library");
    assert!(library.categories.contains("library"));
    assert_eq!(library.neighbors, vec!["2".to_string(), "3".to_string()]);

    // Multiple tags on one row all survive.
    let market = map.node("5").unwrap();
    assert!(market.categories.contains("market"));
    assert!(market.categories.contains("grocery"));

    // A row with no tail has no edges.
    let lighthouse = map.node("10").unwrap();
    assert!(lighthouse.neighbors.is_empty());
}

#[test]
fn missing_file_is_an_io_error() {
    let path = fixture_path().with_file_name("does-not-exist.csv");
    assert!(load_map(&path).is_err());
}

#[test]
fn scheduler_locations_come_from_every_row() {
    let file = write_csv("name\n'Central Library'\nCity Hall\n{River Park}\n");
    let locations = read_locations(file.path()).unwrap();
    assert_eq!(locations, vec!["Central Library", "City Hall", "River Park"]);
}

#[test]
fn dependency_rows_chain_into_pairs() {
    let file = write_csv(
        "prerequisite,dependent\n\
         'Central Library','City Hall'\n\
         'City Hall','North Market','River Park'\n",
    );
    let edges = read_dependencies(file.path()).unwrap();
    assert_eq!(
        edges,
        vec![
            ("Central Library".to_string(), "City Hall".to_string()),
            ("City Hall".to_string(), "North Market".to_string()),
            ("North Market".to_string(), "River Park".to_string()),
        ]
    );
}
