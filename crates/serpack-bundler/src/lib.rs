//! Multi-entry builds with shared chunk extraction.
//!
//! `serpack-bundler` sits above a transformation backend. It analyzes every
//! entry, decides which modules are shared between callers, and drives the
//! backend once per entry and once per shared chunk. The backend asks a
//! [`ResolveHook`] how to treat each reference it meets; the hook answers
//! "inline" or "external", compiling a promoted module as its own chunk the
//! first time it is seen.
//!
//! ```no_run
//! use serpack_bundler::{Backend, Compiler};
//! use serpack_config::{BuildOptions, OutputFormat};
//!
//! # async fn demo(backend: &dyn Backend) -> serpack_bundler::Result<()> {
//! let options = BuildOptions::new()
//!     .entry("a", "src/a.ts")
//!     .entry("b", "src/b.ts")
//!     .formats([OutputFormat::Cjs, OutputFormat::Esm])
//!     .clean(true);
//!
//! let report = Compiler::new(options)?.compile(backend).await?;
//! for chunk in report.chunks() {
//!     println!("{} -> {}", chunk.module.display(), chunk.output);
//! }
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use serpack_config::ConfigError;
use serpack_graph::runtime::RuntimeError;
use serpack_graph::{AnalyzeError, ResolveError};

pub mod backend;
pub mod cache;
pub mod compiler;
pub mod diagnostics;
pub mod naming;
pub mod paths;
pub mod proxy;
pub mod report;

mod hook;
mod orchestrator;

#[cfg(feature = "dts-generation")]
pub mod dts;

#[cfg(feature = "logging")]
pub mod logging;

pub use backend::{Backend, CompileRequest, HookOutcome, ModuleReference, ResolveHook};
pub use cache::{ChunkCache, Claim};
pub use compiler::{BuildPlan, Compiler, ResolvedEntry};
pub use diagnostics::Diagnostic;
pub use naming::{ChunkIdSource, ContentHashIds, SequentialIds};
pub use report::{Artifact, ArtifactKind, BuildReport};

#[cfg(feature = "dts-generation")]
pub use dts::DeclarationReport;

// Re-export the crates every caller needs alongside the bundler
pub use serpack_config as config;
pub use serpack_graph as graph;

/// Result type for bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by a build.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A specifier could not be resolved while the backend was compiling.
    #[error("Failed to resolve '{specifier}' imported from '{}': {}", importer.display(), source.reason)]
    Resolution {
        specifier: String,
        importer: PathBuf,
        #[source]
        source: ResolveError,
    },

    /// Options failed validation.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Module graph analysis failed.
    #[error("Analysis failed: {0}")]
    Analysis(#[from] AnalyzeError),

    /// The backend reported errors for a root.
    #[error("Failed to compile '{}': {}", root.display(), diagnostics::summarize(diagnostics))]
    Transform {
        root: PathBuf,
        diagnostics: Vec<Diagnostic>,
    },

    /// A naming template produced a chunk path that is already taken.
    #[error("Chunk output '{output}' for '{}' is already used by '{}'", module.display(), existing.display())]
    ChunkNameCollision {
        output: String,
        module: PathBuf,
        existing: PathBuf,
    },

    /// Reading or writing through the runtime failed.
    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::Resolution { .. } => "RESOLUTION_ERROR",
            Error::Analysis(AnalyzeError::Resolution { .. }) => "RESOLUTION_ERROR",
            Error::Analysis(_) => "ANALYSIS_ERROR",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Transform { .. } => "TRANSFORM_ERROR",
            Error::ChunkNameCollision { .. } => "CHUNK_NAME_COLLISION",
            Error::Runtime(_) => "RUNTIME_ERROR",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::Resolution { specifier, .. }
            | Error::Analysis(AnalyzeError::Resolution { specifier, .. }) => Some(Box::new(
                format!(
                    "Check that '{specifier}' exists, or add it to 'externals' if it is provided at runtime"
                ),
            )),
            Error::Config(err) => err
                .hint()
                .map(|hint| Box::new(hint.to_string()) as Box<dyn std::fmt::Display>),
            Error::ChunkNameCollision { .. } => Some(Box::new(
                "Add [index] to the chunk name template so every chunk gets a unique name",
            )),
            Error::Transform { .. } => Some(Box::new(
                "Output may be incomplete; fix the errors and rebuild with 'clean' enabled",
            )),
            _ => None,
        }
    }

    fn related(&self) -> Option<Box<dyn Iterator<Item = &dyn miette::Diagnostic> + '_>> {
        match self {
            Error::Transform { diagnostics, .. } if diagnostics.len() > 1 => Some(Box::new(
                diagnostics.iter().map(|d| d as &dyn miette::Diagnostic),
            )),
            _ => None,
        }
    }
}
