//! Tests for config discovery and layered loading.

use std::fs;

use serpack_config::{ConfigDiscovery, ConfigError, OutputFormat};
use tempfile::TempDir;

#[test]
fn finds_nothing_in_empty_dir() {
    let dir = TempDir::new().expect("tempdir");
    let discovery = ConfigDiscovery::new(dir.path()).without_env();
    assert!(discovery.find().is_none());
    assert!(matches!(discovery.load(), Err(ConfigError::NotFound { .. })));
}

#[test]
fn loads_toml_over_defaults() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("serpack.toml"),
        r#"
outdir = "build"
formats = ["cjs", "esm"]
externals = ["react"]

[chunks]
name = "[name].[index]"

[[entries]]
alias = "a"
path = "src/a.ts"

[[entries]]
alias = "b"
path = "src/b.ts"
"#,
    )
    .expect("write config");

    let options = ConfigDiscovery::new(dir.path())
        .without_env()
        .load()
        .expect("load config");

    assert_eq!(options.outdir, std::path::PathBuf::from("build"));
    assert_eq!(options.formats, vec![OutputFormat::Cjs, OutputFormat::Esm]);
    assert_eq!(options.externals, vec!["react".to_string()]);
    assert_eq!(options.chunks.name, "[name].[index]");
    // untouched keys keep their defaults
    assert_eq!(options.chunks.dir, std::path::PathBuf::from("chunks"));
    assert!(options.exclude_node_modules);
    assert_eq!(options.entries.len(), 2);
    assert_eq!(options.entries[0].alias, "a");
    assert_eq!(options.cwd.as_deref(), Some(dir.path()));
}

#[test]
fn toml_wins_over_package_json() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("serpack.toml"), "clean = true\n").expect("write toml");
    fs::write(
        dir.path().join("package.json"),
        r#"{ "name": "pkg", "serpack": { "clean": false } }"#,
    )
    .expect("write package.json");

    let found = ConfigDiscovery::new(dir.path()).find().expect("config");
    assert!(found.ends_with("serpack.toml"));
}

#[test]
fn loads_package_json_field() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("package.json"),
        r#"{
  "name": "pkg",
  "serpack": {
    "entries": [{ "alias": "index", "path": "lib/index.js" }],
    "formats": ["esm"],
    "clean": true
  }
}"#,
    )
    .expect("write package.json");

    let options = ConfigDiscovery::new(dir.path())
        .without_env()
        .load()
        .expect("load");
    assert_eq!(options.formats, vec![OutputFormat::Esm]);
    assert!(options.clean);
    assert_eq!(options.entries[0].alias, "index");
}

#[test]
fn package_json_without_field_is_ignored() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("package.json"), r#"{ "name": "pkg" }"#).expect("write");
    assert!(ConfigDiscovery::new(dir.path()).find().is_none());
}

#[test]
fn invalid_format_surfaces_as_config_error() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("serpack.json"), r#"{ "formats": ["amd"] }"#).expect("write");

    let err = ConfigDiscovery::new(dir.path())
        .without_env()
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}
