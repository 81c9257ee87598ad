//! What a build produced.

use std::path::{Path, PathBuf};

use serpack_config::OutputFormat;

#[cfg(feature = "dts-generation")]
use crate::dts::DeclarationReport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactKind {
    /// An entry compiled by the backend
    Entry { alias: String },
    /// An entry whose module was already emitted; re-exports `target`
    Proxy { alias: String, target: String },
    /// A shared chunk compiled by the backend
    Chunk,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub format: OutputFormat,
    /// Root module of the artifact
    pub module: PathBuf,
    /// Output path relative to the output directory, `/`-separated
    pub output: String,
}

impl Artifact {
    pub fn alias(&self) -> Option<&str> {
        match &self.kind {
            ArtifactKind::Entry { alias } | ArtifactKind::Proxy { alias, .. } => Some(alias),
            ArtifactKind::Chunk => None,
        }
    }

    pub fn is_chunk(&self) -> bool {
        self.kind == ArtifactKind::Chunk
    }
}

/// Artifacts in the order they were finished.
///
/// A chunk finishes before the root that triggered it, so chunks appear
/// ahead of their first importer.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub outdir: PathBuf,
    pub artifacts: Vec<Artifact>,
    #[cfg(feature = "dts-generation")]
    pub declarations: Option<DeclarationReport>,
}

impl BuildReport {
    pub fn chunks(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter().filter(|a| a.is_chunk())
    }

    /// Compiled entries and proxies.
    pub fn entries(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter().filter(|a| !a.is_chunk())
    }

    pub fn entry(&self, alias: &str, format: OutputFormat) -> Option<&Artifact> {
        self.entries()
            .find(|a| a.format == format && a.alias() == Some(alias))
    }

    pub fn chunk_for(&self, module: &Path, format: OutputFormat) -> Option<&Artifact> {
        self.chunks()
            .find(|a| a.format == format && a.module == module)
    }

    /// Absolute location of an artifact.
    pub fn path_of(&self, artifact: &Artifact) -> PathBuf {
        self.outdir.join(&artifact.output)
    }
}
