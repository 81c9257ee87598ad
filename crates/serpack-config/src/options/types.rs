use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::helpers::{
    default_chunk_dir, default_chunk_name, default_cjs_extension, default_condition_names,
    default_esm_extension, default_main_fields, default_resolve_extensions,
};
use crate::error::ConfigError;

/// Module convention of an emitted artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutputFormat {
    /// CommonJS (`require` / `module.exports`)
    Cjs,
    /// ECMAScript modules
    Esm,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cjs => "cjs",
            Self::Esm => "esm",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cjs" | "commonjs" => Ok(Self::Cjs),
            "esm" | "module" => Ok(Self::Esm),
            _ => Err(ConfigError::InvalidFormat(s.to_string())),
        }
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OutputFormat> for String {
    fn from(format: OutputFormat) -> Self {
        format.as_str().to_string()
    }
}

/// A named root module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPoint {
    /// Output file stem for this entry
    pub alias: String,
    /// Module path, absolute or relative to the working directory
    pub path: PathBuf,
}

impl EntryPoint {
    pub fn new(alias: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            alias: alias.into(),
            path: path.into(),
        }
    }
}

/// Output file extension per format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extensions {
    #[serde(default = "default_cjs_extension")]
    pub cjs: String,
    #[serde(default = "default_esm_extension")]
    pub esm: String,
}

impl Extensions {
    pub fn for_format(&self, format: OutputFormat) -> &str {
        match format {
            OutputFormat::Cjs => &self.cjs,
            OutputFormat::Esm => &self.esm,
        }
    }
}

impl Default for Extensions {
    fn default() -> Self {
        Self {
            cjs: default_cjs_extension(),
            esm: default_esm_extension(),
        }
    }
}

/// Where shared chunks go and how they are named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkOptions {
    /// Subdirectory of the output directory holding chunk artifacts
    #[serde(default = "default_chunk_dir")]
    pub dir: PathBuf,

    /// File stem template. Supports `[id]`, `[index]` and `[name]`.
    #[serde(default = "default_chunk_name")]
    pub name: String,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            dir: default_chunk_dir(),
            name: default_chunk_name(),
        }
    }
}

/// Overrides passed to the module resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverOptions {
    /// Extensions tried for extensionless specifiers, in order
    #[serde(default = "default_resolve_extensions")]
    pub extensions: Vec<String>,

    /// Conditions matched against `exports`/`imports` maps
    #[serde(default = "default_condition_names")]
    pub condition_names: Vec<String>,

    /// package.json fields consulted for a package's entry
    #[serde(default = "default_main_fields")]
    pub main_fields: Vec<String>,

    /// Path aliases (`"@app" = "./src"`)
    #[serde(default)]
    pub alias: IndexMap<String, PathBuf>,

    /// Directories used to resolve server-relative (`/foo`) specifiers
    #[serde(default)]
    pub roots: Vec<PathBuf>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            extensions: default_resolve_extensions(),
            condition_names: default_condition_names(),
            main_fields: default_main_fields(),
            alias: IndexMap::new(),
            roots: Vec::new(),
        }
    }
}
