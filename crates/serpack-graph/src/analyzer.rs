//! Module graph builder.
//!
//! Walks the import graph breadth-first from one entry. Static specifiers are
//! classified as builtin, external or resolved file; resolved files that pass
//! the [`InclusionPolicy`] are parsed in turn. Dynamic imports are recorded
//! and never followed. Any resolution or parse failure aborts the walk, so a
//! graph is either complete or absent.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::FxIndexMap;
use crate::builtin::is_builtin;
use crate::filter::InclusionPolicy;
use crate::graph::ModuleGraph;
use crate::parser::{ParseError, RawImport, parse_module};
use crate::record::{FileRecord, ImportEdge, ImportKind, ImportTarget};
use crate::resolver::{ResolveError, Resolver};
use crate::runtime::{Runtime, RuntimeError};

/// Largest source file the analyzer will read (10 MiB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Default cap on modules reachable from a single entry.
pub const DEFAULT_MAX_MODULES: usize = 100_000;

/// Error that can occur during graph analysis.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error("Failed to read file '{}': {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: RuntimeError,
    },

    #[error("Failed to resolve module '{specifier}' from '{}': {}", importer.display(), source.reason)]
    Resolution {
        specifier: String,
        importer: PathBuf,
        #[source]
        source: ResolveError,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Too many modules processed: {count} modules (max: {max} allowed)")]
    TooManyModules { count: usize, max: usize },

    #[error("File too large: {} is {size} bytes (max: {max} bytes)", path.display())]
    FileTooLarge {
        path: PathBuf,
        size: usize,
        max: usize,
    },
}

/// Builds [`ModuleGraph`]s.
///
/// Records are cached by absolute path for the analyzer's lifetime, so
/// analyzing several entries that share modules parses each module once.
#[derive(Debug)]
pub struct Analyzer {
    resolver: Arc<dyn Resolver>,
    runtime: Arc<dyn Runtime>,
    policy: InclusionPolicy,
    max_modules: usize,
    records: Mutex<FxHashMap<PathBuf, Arc<FileRecord>>>,
}

impl Analyzer {
    pub fn new(
        resolver: Arc<dyn Resolver>,
        runtime: Arc<dyn Runtime>,
        policy: InclusionPolicy,
    ) -> Self {
        Self {
            resolver,
            runtime,
            policy,
            max_modules: DEFAULT_MAX_MODULES,
            records: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn with_max_modules(mut self, max: usize) -> Self {
        self.max_modules = max;
        self
    }

    pub fn policy(&self) -> &InclusionPolicy {
        &self.policy
    }

    /// Analyze everything reachable from `entry` (an absolute module path).
    pub async fn analyze(&self, entry: &Path) -> Result<ModuleGraph, AnalyzeError> {
        let entry = path_clean::clean(entry);
        let mut files: FxIndexMap<PathBuf, Arc<FileRecord>> = FxIndexMap::default();
        let mut seen: FxHashSet<PathBuf> = FxHashSet::default();
        let mut queue = VecDeque::new();

        seen.insert(entry.clone());
        queue.push_back(entry.clone());

        while let Some(path) = queue.pop_front() {
            if files.len() >= self.max_modules {
                return Err(AnalyzeError::TooManyModules {
                    count: files.len(),
                    max: self.max_modules,
                });
            }

            let record = self.record_for(&path).await?;
            for target in record.file_imports() {
                if self.policy.includes(target) && seen.insert(target.to_path_buf()) {
                    queue.push_back(target.to_path_buf());
                }
            }
            files.insert(path, record);
        }

        tracing::debug!(entry = %entry.display(), modules = files.len(), "analyzed module graph");
        Ok(ModuleGraph::new(entry, files))
    }

    async fn record_for(&self, path: &Path) -> Result<Arc<FileRecord>, AnalyzeError> {
        if let Some(record) = self.records.lock().get(path) {
            return Ok(Arc::clone(record));
        }

        let record = Arc::new(self.load_record(path).await?);
        self.records
            .lock()
            .insert(path.to_path_buf(), Arc::clone(&record));
        Ok(record)
    }

    async fn load_record(&self, path: &Path) -> Result<FileRecord, AnalyzeError> {
        let source = self.read_source(path).await?;

        if path.extension().is_some_and(|ext| ext == "json") {
            return Ok(FileRecord {
                path: path.to_path_buf(),
                source,
                imports: Vec::new(),
                exports: None,
            });
        }

        let parsed = parse_module(path, &source)?;
        let from_dir = path.parent().unwrap_or(path);
        let imports = parsed
            .imports
            .into_iter()
            .map(|import| self.resolve_import(from_dir, path, import))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FileRecord {
            path: path.to_path_buf(),
            source,
            imports,
            exports: Some(parsed.exports),
        })
    }

    fn resolve_import(
        &self,
        from_dir: &Path,
        importer: &Path,
        import: RawImport,
    ) -> Result<ImportEdge, AnalyzeError> {
        let RawImport {
            raw,
            specifier,
            kind,
        } = import;

        let target = match kind {
            ImportKind::Dynamic => ImportTarget::Dynamic(specifier.clone()),
            ImportKind::Static if is_builtin(&specifier) => ImportTarget::Builtin(specifier.clone()),
            ImportKind::Static if self.policy.is_external_specifier(&specifier) => {
                ImportTarget::External(specifier.clone())
            }
            ImportKind::Static => {
                let resolved = self
                    .resolver
                    .resolve(from_dir, &specifier)
                    .map_err(|source| AnalyzeError::Resolution {
                        specifier: specifier.clone(),
                        importer: importer.to_path_buf(),
                        source,
                    })?;
                ImportTarget::File(path_clean::clean(resolved))
            }
        };

        Ok(ImportEdge {
            raw,
            specifier,
            target,
            kind,
        })
    }

    async fn read_source(&self, path: &Path) -> Result<String, AnalyzeError> {
        let bytes = self
            .runtime
            .read_file(path)
            .await
            .map_err(|source| AnalyzeError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;

        if bytes.len() > MAX_FILE_SIZE {
            return Err(AnalyzeError::FileTooLarge {
                path: path.to_path_buf(),
                size: bytes.len(),
                max: MAX_FILE_SIZE,
            });
        }

        String::from_utf8(bytes).map_err(|e| AnalyzeError::ReadFile {
            path: path.to_path_buf(),
            source: RuntimeError::Other(format!("Invalid UTF-8: {e}")),
        })
    }
}
