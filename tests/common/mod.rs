//! Shared test utilities for integration tests
#![allow(dead_code)]

use funnelscope::{parser, Catalog, GeneratorConfig, QuerySpec};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Load a catalog fixture from the tests/test_data directory
pub fn load_fixture(name: &str) -> Catalog {
    let path = format!("tests/test_data/{}", name);
    parser::parse_file(&path)
        .unwrap_or_else(|e| panic!("Failed to load test data {}: {}", name, e))
}

/// Load a generator config fixture from the tests/test_data directory
pub fn load_generator(name: &str) -> GeneratorConfig {
    let path = format!("tests/test_data/{}", name);
    parser::parse_generator_file(&path)
        .unwrap_or_else(|e| panic!("Failed to load generator config {}: {}", name, e))
}

/// Load a query spec fixture (YAML) from the tests/test_data directory
pub fn load_spec(name: &str) -> QuerySpec {
    let path = format!("tests/test_data/{}", name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read query spec {}: {}", name, e));
    serde_yaml::from_str(&text)
        .unwrap_or_else(|e| panic!("Failed to parse query spec {}: {}", name, e))
}

pub fn builtin() -> Catalog {
    Catalog::builtin().expect("embedded catalog should load")
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
