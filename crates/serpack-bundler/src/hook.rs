//! Per-root resolution hook.

use std::path::Path;

use async_trait::async_trait;
use serpack_config::OutputFormat;
use serpack_graph::{ImportKind, InclusionPolicy, is_builtin};

use crate::backend::{HookOutcome, ModuleReference, ResolveHook};
use crate::orchestrator::Orchestrator;
use crate::paths::relative_specifier;
use crate::{Error, Result};

/// Answers the backend's resolution requests while one root compiles.
///
/// Decision order:
/// 1. dynamic imports stay external, untouched
/// 2. builtins and configured externals stay external, untouched
/// 3. the reference is resolved; failure aborts the build
/// 4. files under `node_modules` (whether or not analysis followed them)
///    and externally listed files stay external, untouched
/// 5. the root itself is inlined
/// 6. modules outside the importer's exclude set are inlined
/// 7. excluded modules become a chunk (compiled on first claim) and the
///    reference is rewritten to the chunk's path
pub(crate) struct RootHook<'o> {
    pub(crate) orchestrator: &'o Orchestrator<'o>,
    pub(crate) root: &'o Path,
    /// Output path of the artifact being compiled
    pub(crate) output: &'o str,
    pub(crate) format: OutputFormat,
}

#[async_trait]
impl ResolveHook for RootHook<'_> {
    async fn resolve(&self, reference: ModuleReference<'_>) -> Result<HookOutcome> {
        let specifier = reference.specifier;
        let external = || -> Result<HookOutcome> { Ok(HookOutcome::External(specifier.to_string())) };

        if reference.kind == ImportKind::Dynamic {
            return external();
        }

        let policy = self.orchestrator.policy();
        if is_builtin(specifier) || policy.is_external_specifier(specifier) {
            return external();
        }

        let from_dir = reference.importer.parent().unwrap_or(reference.importer);
        let resolved = self
            .orchestrator
            .resolver()
            .resolve(from_dir, specifier)
            .map(path_clean::clean)
            .map_err(|source| Error::Resolution {
                specifier: specifier.to_string(),
                importer: reference.importer.to_path_buf(),
                source,
            })?;

        if InclusionPolicy::is_vendored(&resolved) || !policy.includes(&resolved) {
            return external();
        }

        // The importer may itself be inlined into this root; its own record
        // decides whether the reference is shared.
        if resolved == self.root
            || !self
                .orchestrator
                .classification()
                .is_excluded(reference.importer, &resolved)
        {
            return Ok(HookOutcome::Inline(resolved));
        }

        let chunk = self.orchestrator.ensure_chunk(resolved, self.format).await?;
        let rewritten = relative_specifier(self.output, &chunk);
        tracing::debug!(
            root = %self.root.display(),
            specifier,
            rewritten = %rewritten,
            "externalized shared module"
        );
        Ok(HookOutcome::External(rewritten))
    }
}
