//! Build orchestration.
//!
//! Entries run one after another in declaration order, each once per format.
//! Shared chunks are compiled from inside the resolution hook: the hook
//! claims a cache slot, awaits the nested chunk build, and only then answers
//! the backend, so a chunk artifact always exists before the first artifact
//! importing it is finished.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serpack_config::{Extensions, OutputFormat};
use serpack_graph::runtime::Runtime;
use serpack_graph::{Classification, InclusionPolicy, Resolver};

use crate::Result;
use crate::backend::{Backend, CompileRequest};
use crate::cache::{ChunkCache, Claim};
use crate::compiler::{BuildPlan, ResolvedEntry};
use crate::hook::RootHook;
use crate::naming::ChunkNamer;
use crate::paths::relative_specifier;
use crate::proxy::render_proxy;
use crate::report::{Artifact, ArtifactKind};

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Output settings for one run.
#[derive(Debug, Clone)]
pub(crate) struct OutputSettings {
    /// Absolute output directory
    pub(crate) outdir: PathBuf,
    pub(crate) formats: Vec<OutputFormat>,
    pub(crate) extensions: Extensions,
    pub(crate) namer: ChunkNamer,
}

/// Everything emitted for one format in this run.
#[derive(Debug, Default)]
struct FormatState {
    chunks: ChunkCache,
    /// Entry module → entry output, registered before compiling
    entries: Mutex<FxHashMap<PathBuf, String>>,
}

impl FormatState {
    fn emitted_output(&self, module: &Path) -> Option<String> {
        let entry = self.entries.lock().get(module).cloned();
        entry.or_else(|| self.chunks.get(module))
    }
}

pub(crate) struct Orchestrator<'a> {
    backend: &'a dyn Backend,
    plan: &'a BuildPlan,
    resolver: &'a dyn Resolver,
    runtime: &'a dyn Runtime,
    policy: &'a InclusionPolicy,
    settings: OutputSettings,
    /// Indexed by [`format_slot`]
    states: [FormatState; 2],
    artifacts: Mutex<Vec<Artifact>>,
}

fn format_slot(format: OutputFormat) -> usize {
    match format {
        OutputFormat::Cjs => 0,
        OutputFormat::Esm => 1,
    }
}

impl<'a> Orchestrator<'a> {
    pub(crate) fn new(
        backend: &'a dyn Backend,
        plan: &'a BuildPlan,
        resolver: &'a dyn Resolver,
        runtime: &'a dyn Runtime,
        policy: &'a InclusionPolicy,
        settings: OutputSettings,
    ) -> Self {
        Self {
            backend,
            plan,
            resolver,
            runtime,
            policy,
            settings,
            states: Default::default(),
            artifacts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn resolver(&self) -> &dyn Resolver {
        self.resolver
    }

    pub(crate) fn policy(&self) -> &InclusionPolicy {
        self.policy
    }

    pub(crate) fn classification(&self) -> &Classification {
        self.plan.classification()
    }

    fn state(&self, format: OutputFormat) -> &FormatState {
        &self.states[format_slot(format)]
    }

    /// Build every entry in every format.
    pub(crate) async fn run(&self) -> Result<()> {
        for entry in self.plan.entries() {
            for &format in &self.settings.formats {
                self.build_entry(entry, format).await?;
            }
        }
        Ok(())
    }

    pub(crate) fn into_artifacts(self) -> Vec<Artifact> {
        self.artifacts.into_inner()
    }

    async fn build_entry(&self, entry: &ResolvedEntry, format: OutputFormat) -> Result<()> {
        let state = self.state(format);
        let output = format!(
            "{}{}",
            entry.alias,
            self.settings.extensions.for_format(format)
        );

        if let Some(target) = state.emitted_output(&entry.path) {
            return self.write_proxy(entry, format, output, target).await;
        }

        state
            .entries
            .lock()
            .insert(entry.path.clone(), output.clone());
        self.build_root(entry.path.clone(), output.clone(), format)
            .await?;

        tracing::info!(entry = %entry.alias, %format, output = %output, "emitted entry");
        self.push(Artifact {
            kind: ArtifactKind::Entry {
                alias: entry.alias.clone(),
            },
            format,
            module: entry.path.clone(),
            output,
        });
        Ok(())
    }

    /// Compile one root through the backend with its own hook.
    fn build_root(&self, root: PathBuf, output: String, format: OutputFormat) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            let outfile = self.settings.outdir.join(&output);
            let hook = RootHook {
                orchestrator: self,
                root: &root,
                output: &output,
                format,
            };
            tracing::debug!(root = %root.display(), output = %output, %format, "compiling root");
            self.backend
                .compile(
                    CompileRequest {
                        root: &root,
                        outfile: &outfile,
                        format,
                    },
                    &hook,
                )
                .await
        })
    }

    /// Output path of the chunk for `module`, compiling it on first claim.
    pub(crate) async fn ensure_chunk(&self, module: PathBuf, format: OutputFormat) -> Result<String> {
        let state = self.state(format);
        let source = self.plan.source_of(&module).unwrap_or_default();
        let extension = self.settings.extensions.for_format(format);

        let claim = state.chunks.claim(&module, |index| {
            self.settings
                .namer
                .output_path(&module, source, index, extension)
        })?;

        match claim {
            Claim::Existing(output) => Ok(output),
            Claim::New(output) => {
                self.build_root(module.clone(), output.clone(), format)
                    .await?;
                tracing::info!(module = %module.display(), %format, output = %output, "emitted chunk");
                self.push(Artifact {
                    kind: ArtifactKind::Chunk,
                    format,
                    module,
                    output: output.clone(),
                });
                Ok(output)
            }
        }
    }

    async fn write_proxy(
        &self,
        entry: &ResolvedEntry,
        format: OutputFormat,
        output: String,
        target: String,
    ) -> Result<()> {
        let specifier = relative_specifier(&output, &target);
        let has_default = self
            .plan
            .record(&entry.path)
            .is_some_and(|record| record.has_default_export());
        let code = render_proxy(format, &specifier, has_default);

        self.runtime
            .write_file(&self.settings.outdir.join(&output), code.as_bytes())
            .await?;

        tracing::info!(entry = %entry.alias, %format, target = %target, "emitted proxy");
        self.push(Artifact {
            kind: ArtifactKind::Proxy {
                alias: entry.alias.clone(),
                target,
            },
            format,
            module: entry.path.clone(),
            output,
        });
        Ok(())
    }

    fn push(&self, artifact: Artifact) {
        self.artifacts.lock().push(artifact);
    }
}
