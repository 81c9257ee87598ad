//! Per-file facts recorded by the analyzer.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Static or dynamic import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    Static,
    Dynamic,
}

/// Where an import edge points.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ImportTarget {
    /// Resolved absolute module path
    File(PathBuf),
    /// Runtime builtin, kept verbatim (`fs`, `node:path`)
    Builtin(String),
    /// Specifier matched by the externals list, never resolved
    External(String),
    /// Dynamic import text, never resolved
    Dynamic(String),
}

impl ImportTarget {
    pub fn as_file(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            _ => None,
        }
    }
}

impl fmt::Display for ImportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Builtin(spec) => write!(f, "builtin:{spec}"),
            Self::External(spec) => write!(f, "external:{spec}"),
            Self::Dynamic(spec) => write!(f, "dynamic:{spec}"),
        }
    }
}

/// One import statement or expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportEdge {
    /// Specifier as written in source, quotes included
    pub raw: String,
    /// Specifier value
    pub specifier: String,
    pub target: ImportTarget,
    pub kind: ImportKind,
}

impl ImportEdge {
    pub fn is_dynamic(&self) -> bool {
        self.kind == ImportKind::Dynamic
    }
}

/// Analysis result for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub path: PathBuf,
    #[serde(skip)]
    pub source: String,
    /// Imports in source order
    pub imports: Vec<ImportEdge>,
    /// Exported names (`default` for default exports). `None` for
    /// modules that are not parsed as JavaScript, such as JSON.
    pub exports: Option<Vec<String>>,
}

impl FileRecord {
    pub fn has_default_export(&self) -> bool {
        self.exports
            .as_ref()
            .is_some_and(|names| names.iter().any(|n| n == "default"))
    }

    /// Resolved file dependencies, in source order.
    pub fn file_imports(&self) -> impl Iterator<Item = &Path> {
        self.imports.iter().filter_map(|edge| edge.target.as_file())
    }
}
