//! Build options shared by the graph and bundler crates.

mod helpers;
mod types;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use types::{ChunkOptions, EntryPoint, Extensions, OutputFormat, ResolverOptions};

use crate::error::{ConfigError, Result};
use helpers::{default_formats, default_output_dir, default_true};

/// Options for one multi-entry build.
///
/// Entries keep the order they were declared in; that order decides which of
/// two entries resolving to the same module is compiled and which one becomes
/// a re-export proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Named root modules, in build order
    #[serde(default)]
    pub entries: Vec<EntryPoint>,

    /// Output directory for entry and chunk artifacts
    #[serde(default = "default_output_dir")]
    pub outdir: PathBuf,

    /// Every entry is built once per format, in this order
    #[serde(default = "default_formats")]
    pub formats: Vec<OutputFormat>,

    /// Output file extension per format
    #[serde(default)]
    pub extensions: Extensions,

    /// Specifiers that are never bundled (exact name or `name/subpath`)
    #[serde(default)]
    pub externals: Vec<String>,

    /// Leave anything under `node_modules` external
    #[serde(default = "default_true")]
    pub exclude_node_modules: bool,

    /// Shared chunk layout
    #[serde(default)]
    pub chunks: ChunkOptions,

    /// Remove the output directory before writing
    #[serde(default)]
    pub clean: bool,

    /// Module resolver overrides
    #[serde(default)]
    pub resolver: ResolverOptions,

    /// Working directory for relative entry and output paths.
    /// Falls back to the process working directory.
    #[serde(default)]
    pub cwd: Option<PathBuf>,

    /// Emit `.d.ts` files for the analyzed sources into this directory
    #[serde(default)]
    pub declarations: Option<PathBuf>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            outdir: default_output_dir(),
            formats: default_formats(),
            extensions: Extensions::default(),
            externals: Vec::new(),
            exclude_node_modules: true,
            chunks: ChunkOptions::default(),
            clean: false,
            resolver: ResolverOptions::default(),
            cwd: None,
            declarations: None,
        }
    }
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from TOML text.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| ConfigError::InvalidValue {
            field: "toml".to_string(),
            hint: Some(e.message().to_string()),
        })
    }

    /// Build options from an already-parsed JSON value (package.json field, API input).
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "options".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Add an entry point.
    pub fn entry(mut self, alias: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.entries.push(EntryPoint::new(alias, path));
        self
    }

    pub fn outdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.outdir = dir.into();
        self
    }

    /// Replace the requested formats.
    pub fn formats(mut self, formats: impl IntoIterator<Item = OutputFormat>) -> Self {
        self.formats = formats.into_iter().collect();
        self
    }

    pub fn extension(mut self, format: OutputFormat, extension: impl Into<String>) -> Self {
        match format {
            OutputFormat::Cjs => self.extensions.cjs = extension.into(),
            OutputFormat::Esm => self.extensions.esm = extension.into(),
        }
        self
    }

    pub fn external(mut self, specifier: impl Into<String>) -> Self {
        self.externals.push(specifier.into());
        self
    }

    pub fn exclude_node_modules(mut self, exclude: bool) -> Self {
        self.exclude_node_modules = exclude;
        self
    }

    pub fn chunk_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.chunks.dir = dir.into();
        self
    }

    pub fn chunk_name(mut self, template: impl Into<String>) -> Self {
        self.chunks.name = template.into();
        self
    }

    pub fn clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn alias(mut self, from: impl Into<String>, to: impl Into<PathBuf>) -> Self {
        self.resolver.alias.insert(from.into(), to.into());
        self
    }

    pub fn declarations(mut self, dir: impl Into<PathBuf>) -> Self {
        self.declarations = Some(dir.into());
        self
    }

    /// Join `path` onto the configured working directory unless it is absolute.
    pub fn absolutize(&self, cwd: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        self.cwd.as_deref().unwrap_or(cwd).join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let options = BuildOptions::default();
        assert_eq!(options.outdir, PathBuf::from("dist"));
        assert_eq!(options.formats, vec![OutputFormat::Cjs]);
        assert_eq!(options.chunks.dir, PathBuf::from("chunks"));
        assert_eq!(options.chunks.name, "[id].[index]");
        assert!(options.exclude_node_modules);
        assert!(!options.clean);
        assert_eq!(options.resolver.condition_names, vec!["node", "import"]);
    }

    #[test]
    fn toml_keeps_entry_order() {
        let options = BuildOptions::from_toml_str(
            r#"
            formats = ["esm", "cjs"]

            [[entries]]
            alias = "zeta"
            path = "src/zeta.ts"

            [[entries]]
            alias = "alpha"
            path = "src/alpha.ts"
            "#,
        )
        .unwrap();

        let aliases: Vec<_> = options.entries.iter().map(|e| e.alias.as_str()).collect();
        assert_eq!(aliases, ["zeta", "alpha"]);
        assert_eq!(options.formats, vec![OutputFormat::Esm, OutputFormat::Cjs]);
        assert_eq!(options.extensions.esm, ".mjs");
    }

    #[test]
    fn unknown_format_in_toml_is_rejected() {
        let err = BuildOptions::from_toml_str(r#"formats = ["umd"]"#).unwrap_err();
        match err {
            ConfigError::InvalidValue { hint, .. } => {
                assert!(hint.unwrap_or_default().contains("umd"));
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn absolutize_prefers_configured_cwd() {
        let options = BuildOptions::new().cwd("/project");
        assert_eq!(
            options.absolutize(Path::new("/elsewhere"), Path::new("src/a.ts")),
            PathBuf::from("/project/src/a.ts")
        );
        assert_eq!(
            options.absolutize(Path::new("/elsewhere"), Path::new("/abs/a.ts")),
            PathBuf::from("/abs/a.ts")
        );
    }
}
