use std::fs;

use serde::{Deserialize, Serialize};
use tempfile::tempdir;
use toml::Table;

use crate::{Config, Error, merge_tables};

// Test configurations for our unit tests
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
struct TestConfig {
    name: String,
    iterations: i32,
    nested: NestedConfig,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
struct NestedConfig {
    threshold: f64,
    enabled: bool,
}

impl Config for TestConfig {
    const PATH: &'static str = "test_config.toml";
}

const MAIN_TOML: &str = r#"
name = "original"
iterations = 10

[nested]
threshold = 0.5
enabled = true
"#;

#[test]
fn test_merge_tables_overlay_wins() {
    let main: Table = MAIN_TOML.parse().unwrap();
    let overlay: Table = r#"
        iterations = 20

        [nested]
        enabled = false
    "#
    .parse()
    .unwrap();

    let merged = merge_tables(main, overlay, false);

    assert_eq!(merged["name"].as_str(), Some("original"));
    assert_eq!(merged["iterations"].as_integer(), Some(20));

    let nested = merged["nested"].as_table().unwrap();
    assert_eq!(nested["threshold"].as_float(), Some(0.5));
    assert_eq!(nested["enabled"].as_bool(), Some(false));
}

#[test]
fn test_merge_tables_new_keys() {
    let main: Table = MAIN_TOML.parse().unwrap();
    let overlay: Table = "seed = 42".parse().unwrap();

    let without = merge_tables(main.clone(), overlay.clone(), false);
    assert!(!without.contains_key("seed"));

    let with = merge_tables(main, overlay, true);
    assert_eq!(with["seed"].as_integer(), Some(42));
}

#[test]
fn test_merge_tables_keeps_table_over_scalar() {
    let main: Table = MAIN_TOML.parse().unwrap();
    let overlay: Table = "nested = 3".parse().unwrap();

    let merged = merge_tables(main, overlay, false);
    assert!(merged["nested"].is_table());
}

#[test]
fn test_load_and_overlay() {
    let temp_dir = tempdir().unwrap();
    let config_dir = temp_dir.path().join("config");
    let overlay_dir = temp_dir.path().join("config/overlay/field");

    fs::create_dir_all(&overlay_dir).unwrap();
    fs::write(config_dir.join(TestConfig::PATH), MAIN_TOML).unwrap();
    fs::write(
        overlay_dir.join(TestConfig::PATH),
        "name = \"field\"\n[nested]\nthreshold = 0.25\n",
    )
    .unwrap();

    let main = TestConfig::load(&config_dir).unwrap();
    assert_eq!(main.name, "original");
    assert_eq!(main.nested.threshold, 0.5);

    let overlaid = TestConfig::load_with_overlay(&config_dir, &overlay_dir).unwrap();
    assert_eq!(overlaid.name, "field");
    assert_eq!(overlaid.iterations, 10);
    assert_eq!(overlaid.nested.threshold, 0.25);
    assert!(overlaid.nested.enabled);
}

#[test]
fn test_missing_overlay_uses_main() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join(TestConfig::PATH), MAIN_TOML).unwrap();

    let config =
        TestConfig::load_with_overlay(temp_dir.path(), temp_dir.path().join("nowhere")).unwrap();
    assert_eq!(config, TestConfig::load(temp_dir.path()).unwrap());
}

#[test]
fn test_missing_config() {
    let temp_dir = tempdir().unwrap();

    let result = TestConfig::load(temp_dir.path());
    assert!(matches!(result, Err(Error::NotFound { .. })));
}

#[test]
fn test_invalid_config() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join(TestConfig::PATH), "name = \"missing fields\"").unwrap();

    let result = TestConfig::load(temp_dir.path());
    assert!(matches!(result, Err(Error::Deserialize { .. })));
}

#[test]
fn test_store_then_load() {
    let temp_dir = tempdir().unwrap();
    let config_dir = temp_dir.path().join("fresh");

    let config = TestConfig {
        name: "stored".to_string(),
        iterations: 3,
        nested: NestedConfig {
            threshold: 1e-3,
            enabled: false,
        },
    };

    config.store(&config_dir).unwrap();
    assert_eq!(TestConfig::load(&config_dir).unwrap(), config);
}
