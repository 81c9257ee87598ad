//! Tests for build option validation.

use serpack_config::{
    BuildOptions, ConfigError, ConfigValidator, OutputFormat, SchemaValidator, validate_schema,
};

fn base() -> BuildOptions {
    BuildOptions::new().entry("index", "src/index.ts")
}

#[test]
fn accepts_minimal_options() {
    assert!(validate_schema(&base()).is_ok());
}

#[test]
fn rejects_missing_entries() {
    let err = SchemaValidator.validate(&BuildOptions::new()).unwrap_err();
    assert!(matches!(err, ConfigError::NoEntries));
    assert!(err.hint().is_some());
}

#[test]
fn rejects_duplicate_alias() {
    let options = base().entry("index", "src/other.ts");
    let err = validate_schema(&options).unwrap_err();
    match err {
        ConfigError::SchemaValidation { message, .. } => assert!(message.contains("index")),
        other => panic!("expected SchemaValidation, got {other:?}"),
    }
}

#[test]
fn same_path_under_two_aliases_is_allowed() {
    let options = base().entry("alias", "src/index.ts");
    assert!(validate_schema(&options).is_ok());
}

#[test]
fn nested_aliases_are_allowed() {
    let options = base().entry("lib/index", "src/lib.ts");
    assert!(validate_schema(&options).is_ok());
}

#[test]
fn rejects_aliases_escaping_outdir() {
    for alias in ["../index", "/abs/index", "lib/../../x", "lib/", "./index", "lib//x", "lib\\x"] {
        let options = base().entry(alias, "src/lib.ts");
        assert!(
            matches!(validate_schema(&options), Err(ConfigError::SchemaValidation { .. })),
            "alias {alias:?} should be rejected"
        );
    }
}

#[test]
fn rejects_unknown_placeholder() {
    let options = base().chunk_name("[contenthash].[index]");
    assert!(matches!(
        validate_schema(&options),
        Err(ConfigError::UnknownPlaceholder { placeholder, .. }) if placeholder == "contenthash"
    ));
}

#[test]
fn template_without_index_is_accepted() {
    let options = base().chunk_name("[name]-[id]");
    assert!(validate_schema(&options).is_ok());
}

#[test]
fn rejects_empty_and_duplicate_formats() {
    let options = base().formats([]);
    assert!(validate_schema(&options).is_err());

    let options = base().formats([OutputFormat::Esm, OutputFormat::Esm]);
    assert!(validate_schema(&options).is_err());
}

#[test]
fn rejects_extension_without_dot() {
    let options = base().extension(OutputFormat::Esm, "mjs");
    assert!(matches!(
        validate_schema(&options),
        Err(ConfigError::SchemaValidation { .. })
    ));
}

#[test]
fn rejects_chunk_dir_outside_outdir() {
    let options = base().chunk_dir("../shared");
    assert!(validate_schema(&options).is_err());

    let options = base().chunk_dir("/tmp/chunks");
    assert!(validate_schema(&options).is_err());

    let options = base().chunk_dir("assets/chunks");
    assert!(validate_schema(&options).is_ok());
}

#[test]
fn rejects_blank_external() {
    let options = base().external("  ");
    assert!(validate_schema(&options).is_err());
}
