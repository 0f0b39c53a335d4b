#![allow(dead_code)]

use std::path::PathBuf;

use once_cell::sync::Lazy;
use waypoint_lib::{load_map, PoiMap};

static FIXTURE: Lazy<PoiMap> = Lazy::new(|| load_map(&fixture_path()).expect("fixture loads"));

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/poi.csv")
}

pub fn fixture_map() -> &'static PoiMap {
    &FIXTURE
}
