#![allow(non_snake_case)]

use super::*;
use serde_json::json;
use std::fs;
use tempfile::TempDir;
use webextgen_schema::parse_document;

// Embedded snapshot tests

#[test]
fn EmbeddedSchemas___load___every_document_parses() {
    let files = EmbeddedSchemas.load().unwrap();

    assert!(!files.is_empty());
    for file in &files {
        let namespaces = parse_document(&file.name, &file.text).unwrap();
        assert!(!namespaces.is_empty(), "{} has no namespaces", file.name);
    }
}

#[test]
fn EmbeddedSchemas___load___is_sorted_by_name() {
    let names: Vec<_> = EmbeddedSchemas.load().unwrap().into_iter().map(|f| f.name).collect();
    let mut sorted = names.clone();
    sorted.sort();

    assert_eq!(names, sorted);
}

// Local directory tests

#[test]
fn LocalSchemaDir___load___reads_json_files_sorted() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("tabs.json"), "[]").unwrap();
    fs::write(temp.path().join("alarms.json"), "[{}]").unwrap();
    fs::write(temp.path().join("README.md"), "ignored").unwrap();
    fs::create_dir(temp.path().join("nested.json")).unwrap();

    let files = LocalSchemaDir::new(temp.path()).load().unwrap();

    assert_eq!(
        files,
        vec![
            SchemaFile {
                name: "alarms.json".to_string(),
                text: "[{}]".to_string()
            },
            SchemaFile {
                name: "tabs.json".to_string(),
                text: "[]".to_string()
            },
        ]
    );
}

#[test]
fn LocalSchemaDir___load___missing_directory___names_path() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("absent");

    let error = LocalSchemaDir::new(&missing).load().unwrap_err();

    assert!(error.to_string().contains("absent"));
}

#[test]
fn LocalSchemaDir___load___no_schema_files___fails() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("notes.txt"), "").unwrap();

    assert!(LocalSchemaDir::new(temp.path()).load().is_err());
}

// Remote tests

#[test]
fn listing_url___uses_repository_directory_and_reference() {
    let remote = RemoteConfig {
        repository: "mozilla/gecko-dev".to_string(),
        reference: "release".to_string(),
        directories: vec![],
    };

    assert_eq!(
        listing_url(&remote, "/toolkit/components/extensions/schemas/"),
        "https://api.github.com/repos/mozilla/gecko-dev/contents/toolkit/components/extensions/schemas?ref=release"
    );
}

#[test]
fn schema_downloads___keeps_json_files_with_urls() {
    let entries: Vec<ContentEntry> = serde_json::from_value(json!([
        {"name": "tabs.json", "type": "file", "download_url": "https://raw/tabs.json"},
        {"name": "alarms.json", "type": "file", "download_url": "https://raw/alarms.json"},
        {"name": "jar.mn", "type": "file", "download_url": "https://raw/jar.mn"},
        {"name": "old.json", "type": "dir", "download_url": null},
        {"name": "broken.json", "type": "file"}
    ]))
    .unwrap();

    assert_eq!(
        schema_downloads(entries),
        vec![
            ("alarms.json".to_string(), "https://raw/alarms.json".to_string()),
            ("tabs.json".to_string(), "https://raw/tabs.json".to_string()),
        ]
    );
}

// Selection tests

#[test]
fn source_for___describes_selected_source() {
    let embedded = source_for(&GeneratorConfig::default()).unwrap();
    let local = source_for(&GeneratorConfig {
        source: SourceKind::LocalFiles,
        file_path: Some(PathBuf::from("schemas")),
        ..GeneratorConfig::default()
    })
    .unwrap();
    let remote = source_for(&GeneratorConfig {
        source: SourceKind::Remote,
        ..GeneratorConfig::default()
    })
    .unwrap();

    assert_eq!(embedded.describe(), "embedded snapshot");
    assert_eq!(local.describe(), "schemas");
    assert_eq!(remote.describe(), "mozilla/gecko-dev@master");
}

#[test]
fn source_for___local_files_without_path___fails() {
    let config = GeneratorConfig {
        source: SourceKind::LocalFiles,
        ..GeneratorConfig::default()
    };

    assert!(source_for(&config).is_err());
}
