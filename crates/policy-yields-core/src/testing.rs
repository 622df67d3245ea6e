//! Shared fixtures for unit tests.

use crate::WorldSnapshot;

const WORLD_YAML: &str = include_str!("../tests/data/world.yaml");

pub(crate) fn fixture_world() -> WorldSnapshot {
    WorldSnapshot::from_yaml(WORLD_YAML).expect("fixture world parses")
}
