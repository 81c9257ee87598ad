//! Build entry point: analysis, classification and orchestration.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use serpack_config::{BuildOptions, ChunkNameTemplate, validate_schema};
use serpack_graph::runtime::Runtime;
use serpack_graph::{
    Analyzer, Classification, DependencyIndex, FileRecord, FxIndexMap, InclusionPolicy,
    NodeResolver, Resolver, classify,
};

use crate::backend::Backend;
use crate::naming::{ChunkIdSource, ChunkNamer, ContentHashIds};
use crate::orchestrator::{Orchestrator, OutputSettings};
use crate::report::BuildReport;
use crate::{Error, Result};

/// An entry after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub alias: String,
    /// Absolute, normalized module path
    pub path: PathBuf,
}

/// Everything known before the first compile: resolved entries, every
/// analyzed module, the merged dependency index and its classification.
#[derive(Debug)]
pub struct BuildPlan {
    entries: Vec<ResolvedEntry>,
    records: FxIndexMap<PathBuf, Arc<FileRecord>>,
    index: DependencyIndex,
    classification: Classification,
}

impl BuildPlan {
    pub fn entries(&self) -> &[ResolvedEntry] {
        &self.entries
    }

    pub fn record(&self, path: &Path) -> Option<&FileRecord> {
        self.records.get(path).map(Arc::as_ref)
    }

    pub fn source_of(&self, path: &Path) -> Option<&str> {
        self.record(path).map(|record| record.source.as_str())
    }

    pub fn index(&self) -> &DependencyIndex {
        &self.index
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn records(&self) -> impl Iterator<Item = (&Path, &FileRecord)> {
        self.records
            .iter()
            .map(|(path, record)| (path.as_path(), record.as_ref()))
    }
}

/// Multi-entry compiler.
///
/// Options are validated on construction; nothing is read or written until
/// [`Compiler::plan`] or [`Compiler::compile`] runs.
#[derive(Debug)]
pub struct Compiler {
    options: BuildOptions,
    cwd: PathBuf,
    policy: InclusionPolicy,
    template: ChunkNameTemplate,
    resolver: Arc<dyn Resolver>,
    runtime: Arc<dyn Runtime>,
    ids: Arc<dyn ChunkIdSource>,
}

impl Compiler {
    /// Compiler over the local filesystem.
    #[cfg(not(target_family = "wasm"))]
    pub fn new(options: BuildOptions) -> Result<Self> {
        Self::with_runtime(options, Arc::new(serpack_graph::runtime::NativeRuntime::new()))
    }

    pub fn with_runtime(mut options: BuildOptions, runtime: Arc<dyn Runtime>) -> Result<Self> {
        validate_schema(&options)?;
        let template = ChunkNameTemplate::parse(&options.chunks.name)?;

        let process_cwd = runtime.get_cwd()?;
        let cwd = match options.cwd.take() {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => process_cwd.join(dir),
            None => process_cwd,
        };
        let cwd = path_clean::clean(cwd);
        options.cwd = Some(cwd.clone());

        let resolver = Arc::new(NodeResolver::new(&options.resolver, &cwd));
        let policy = InclusionPolicy::from_options(&options);

        Ok(Self {
            options,
            cwd,
            policy,
            template,
            resolver,
            runtime,
            ids: Arc::new(ContentHashIds::default()),
        })
    }

    /// Replace the module resolver used for entries, analysis and the hook.
    pub fn resolver(mut self, resolver: Arc<dyn Resolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the source of the `[id]` placeholder.
    pub fn id_source(mut self, ids: Arc<dyn ChunkIdSource>) -> Self {
        self.ids = ids;
        self
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn outdir(&self) -> PathBuf {
        path_clean::clean(self.options.absolutize(&self.cwd, &self.options.outdir))
    }

    /// Resolve entries, analyze them and classify the merged index.
    pub async fn plan(&self) -> Result<BuildPlan> {
        if self.options.entries.len() == 1 {
            tracing::warn!("only one entry configured; no modules can be shared");
        }

        let mut entries = Vec::with_capacity(self.options.entries.len());
        for entry in &self.options.entries {
            let candidate = path_clean::clean(self.options.absolutize(&self.cwd, &entry.path));
            let path = self
                .resolver
                .resolve(&self.cwd, &candidate.to_string_lossy())
                .map(path_clean::clean)
                .map_err(|source| Error::Resolution {
                    specifier: entry.path.display().to_string(),
                    importer: self.cwd.clone(),
                    source,
                })?;
            entries.push(ResolvedEntry {
                alias: entry.alias.clone(),
                path,
            });
        }

        let analyzer = Analyzer::new(
            Arc::clone(&self.resolver),
            Arc::clone(&self.runtime),
            self.policy.clone(),
        );
        let mut index = DependencyIndex::new();
        let mut records: FxIndexMap<PathBuf, Arc<FileRecord>> = FxIndexMap::default();
        for entry in &entries {
            if records.contains_key(&entry.path) {
                continue;
            }
            let graph = analyzer.analyze(&entry.path).await?;
            index.merge(&DependencyIndex::from_graph(&graph));
            for (path, record) in graph.iter() {
                records
                    .entry(path.to_path_buf())
                    .or_insert_with(|| Arc::clone(record));
            }
        }
        debug_assert!(index.is_consistent());

        if tracing::enabled!(tracing::Level::DEBUG) {
            let dump = serde_json::to_string_pretty(&index.to_json()).unwrap_or_default();
            tracing::debug!("dependency index:\n{dump}");
        }

        let classification = classify(&index);
        Ok(BuildPlan {
            entries,
            records,
            index,
            classification,
        })
    }

    /// Run a full build through `backend`.
    ///
    /// Planning errors surface before anything is written. A failure during
    /// compilation leaves already written artifacts in place.
    pub async fn compile(&self, backend: &dyn Backend) -> Result<BuildReport> {
        let plan = self.plan().await?;
        let outdir = self.outdir();

        if self.options.clean {
            tracing::debug!(outdir = %outdir.display(), "cleaning output directory");
            self.runtime.remove_dir_all(&outdir).await?;
        }

        let settings = OutputSettings {
            outdir: outdir.clone(),
            formats: self.options.formats.clone(),
            extensions: self.options.extensions.clone(),
            namer: ChunkNamer::new(
                self.template.clone(),
                chunk_dir(&self.options.chunks.dir),
                Arc::clone(&self.ids),
            ),
        };
        let orchestrator = Orchestrator::new(
            backend,
            &plan,
            self.resolver.as_ref(),
            self.runtime.as_ref(),
            &self.policy,
            settings,
        );
        orchestrator.run().await?;

        let report = BuildReport {
            outdir,
            artifacts: orchestrator.into_artifacts(),
            #[cfg(feature = "dts-generation")]
            declarations: match &self.options.declarations {
                Some(dir) => Some(self.emit_declarations(&plan, dir).await),
                None => None,
            },
        };

        tracing::info!(
            entries = report.entries().count(),
            chunks = report.chunks().count(),
            "build finished"
        );
        Ok(report)
    }

    #[cfg(feature = "dts-generation")]
    async fn emit_declarations(&self, plan: &BuildPlan, dir: &Path) -> crate::dts::DeclarationReport {
        let dir = path_clean::clean(self.options.absolutize(&self.cwd, dir));
        let sources = plan
            .records()
            .map(|(path, record)| (path, record.source.as_str()));
        crate::dts::emit_declarations(sources, &dir, self.runtime.as_ref()).await
    }
}

/// Chunk directory as a slash-separated prefix; empty for the output root.
fn chunk_dir(dir: &Path) -> String {
    dir.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_dir_drops_current_dir() {
        assert_eq!(chunk_dir(Path::new("chunks")), "chunks");
        assert_eq!(chunk_dir(Path::new("./shared/chunks")), "shared/chunks");
        assert_eq!(chunk_dir(Path::new(".")), "");
    }

    #[test]
    fn invalid_options_are_rejected_up_front() {
        let err = Compiler::new(BuildOptions::new()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
