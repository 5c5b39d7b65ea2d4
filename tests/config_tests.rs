//! Integration tests for configuration loading and stage building.

use docs_enricher::config::Config;
use docs_enricher::document::parsed::{Document, ParsedDocument};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn document(value: serde_json::Value) -> ParsedDocument {
    ParsedDocument::new(
        Document::new("doc.json", value.to_string().into_bytes()),
        serde_json::from_value(value).unwrap(),
    )
}

#[test]
fn test_from_file_reports_invalid_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[dynamic\nlookup_key_selectors = 3").unwrap();

    let err = Config::from_file(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("config.toml"));
}

#[test]
fn test_from_file_missing() {
    let dir = TempDir::new().unwrap();
    assert!(Config::from_file(dir.path().join("nope.toml")).is_err());
}

#[test]
fn test_config_path_location() {
    if let Some(path) = Config::config_path() {
        assert!(path.ends_with(".config/docs-enricher/config.toml"));
    }
}

#[test]
fn test_configured_pipeline_enriches_document() {
    let dir = TempDir::new().unwrap();
    let catalog = dir.path().join("catalog");
    fs::create_dir(&catalog).unwrap();
    fs::write(catalog.join("2.json"), r#"{"name": "John Smith"}"#).unwrap();
    fs::write(catalog.join("5.json"), r#"{"name": "Peter Jones"}"#).unwrap();
    let defaults = dir.path().join("defaults.json");
    fs::write(&defaults, r#"{"publisher": "Example Press"}"#).unwrap();

    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!(
            r#"
            [static_resources]
            paths = [{defaults:?}]

            [dynamic]
            enrichable_properties_selectors = ["authors[*]"]
            lookup_key_selectors = ["id"]

            [dynamic.finder]
            file_path = {catalog:?}
            file_name_selector = "id"

            [output]
            indent_size = 4
            "#,
            defaults = defaults.to_string_lossy(),
            catalog = catalog.to_string_lossy(),
        ),
    )
    .unwrap();

    let config = Config::from_file(&config_path).unwrap();
    assert_eq!(config.output.indent_size, 4);
    let stages = config.build_stages().unwrap();
    assert_eq!(stages.len(), 2);

    let mut current = document(json!({"authors": [{"id": "2"}, {"id": "5"}]}));
    for stage in &stages {
        current = stage.process(Some(current)).wait_blocking().unwrap();
    }

    let expected = document(json!({
        "authors": [
            {"id": "2", "name": "John Smith"},
            {"id": "5", "name": "Peter Jones"}
        ],
        "publisher": "Example Press"
    }));
    assert_eq!(current.properties(), expected.properties());
}
