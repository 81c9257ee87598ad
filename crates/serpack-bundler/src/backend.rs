//! Seam between the orchestrator and a transformation backend.
//!
//! A backend turns one root module into one artifact on disk. It must call
//! [`ResolveHook::resolve`] for every module reference it meets while
//! compiling that root and honor the answer: inline the module on
//! [`HookOutcome::Inline`], leave the reference in place pointing at the
//! returned specifier on [`HookOutcome::External`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serpack_config::OutputFormat;
use serpack_graph::ImportKind;

use crate::Result;

/// One compile job.
#[derive(Debug, Clone, Copy)]
pub struct CompileRequest<'a> {
    /// Absolute path of the root module
    pub root: &'a Path,
    /// Absolute path the artifact must be written to
    pub outfile: &'a Path,
    pub format: OutputFormat,
}

/// A reference the backend found while compiling a root.
#[derive(Debug, Clone, Copy)]
pub struct ModuleReference<'a> {
    /// Specifier as written
    pub specifier: &'a str,
    /// Absolute path of the module containing the reference
    pub importer: &'a Path,
    pub kind: ImportKind,
}

/// How the backend must treat a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    /// Bundle the module at this path into the current artifact.
    Inline(PathBuf),
    /// Leave the reference external, importing this specifier.
    External(String),
}

/// Resolution interception supplied by the orchestrator.
#[async_trait]
pub trait ResolveHook: Send + Sync {
    async fn resolve(&self, reference: ModuleReference<'_>) -> Result<HookOutcome>;
}

/// A source-to-artifact transformation engine.
///
/// Errors in the compiled code are reported as [`crate::Error::Transform`];
/// errors returned from the hook must be propagated unchanged.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn compile(&self, request: CompileRequest<'_>, hook: &dyn ResolveHook) -> Result<()>;
}
