//! Shared test utilities for serpack-bundler tests
//!
//! `StubBackend` stands in for a real transformation engine: it walks the
//! root's imports through the hook, inlines what it is told to inline and
//! writes a plain-text artifact listing what ended up inside and outside.

#![allow(dead_code)]

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serpack_bundler::config::{BuildOptions, OutputFormat};
use serpack_bundler::graph::parse_module;
use serpack_bundler::graph::runtime::RuntimeError;
use serpack_bundler::{
    Backend, CompileRequest, Compiler, Diagnostic, Error, HookOutcome, ModuleReference,
    ResolveHook, Result, SequentialIds,
};
use tempfile::TempDir;

/// Create a test project with the given files and return its root.
pub fn create_test_project(temp: &TempDir, files: &[(&str, &str)]) -> PathBuf {
    let root = temp.path().to_path_buf();

    for (path, content) in files {
        let file_path = root.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("Failed to create parent directory for {path}: {e}"));
        }
        fs::write(&file_path, content).unwrap_or_else(|e| panic!("Failed to write {path}: {e}"));
    }

    root
}

/// Options rooted at `root` with deterministic chunk ids.
pub fn compiler(options: BuildOptions, root: &Path) -> Compiler {
    Compiler::new(options.cwd(root))
        .unwrap()
        .id_source(Arc::new(SequentialIds::default()))
}

pub fn read(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()))
}

/// One recorded compile call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileCall {
    pub root: PathBuf,
    pub outfile: PathBuf,
    pub format: OutputFormat,
}

#[derive(Debug, Default)]
pub struct StubBackend {
    calls: Mutex<Vec<CompileCall>>,
    failing_roots: Vec<PathBuf>,
}

impl StubBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a transform error whenever `root` is compiled.
    pub fn failing_on(mut self, root: impl Into<PathBuf>) -> Self {
        self.failing_roots.push(root.into());
        self
    }

    pub fn calls(&self) -> Vec<CompileCall> {
        self.calls.lock().clone()
    }

    pub fn compile_count(&self, root: &Path) -> usize {
        self.calls.lock().iter().filter(|c| c.root == root).count()
    }
}

#[async_trait]
impl Backend for StubBackend {
    async fn compile(&self, request: CompileRequest<'_>, hook: &dyn ResolveHook) -> Result<()> {
        self.calls.lock().push(CompileCall {
            root: request.root.to_path_buf(),
            outfile: request.outfile.to_path_buf(),
            format: request.format,
        });

        if self.failing_roots.iter().any(|root| root == request.root) {
            return Err(Error::Transform {
                root: request.root.to_path_buf(),
                diagnostics: vec![
                    Diagnostic::new("Unexpected token").at(request.root, 1, 1),
                    Diagnostic::new("Missing semicolon").at(request.root, 2, 4),
                ],
            });
        }

        let mut inlined = Vec::new();
        let mut externals = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = vec![request.root.to_path_buf()];

        while let Some(path) = queue.pop() {
            if !seen.insert(path.clone()) {
                continue;
            }
            inlined.push(path.clone());
            if path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }

            let source = read(&path);
            let parsed = parse_module(&path, &source).map_err(|e| Error::Transform {
                root: request.root.to_path_buf(),
                diagnostics: vec![Diagnostic::new(e.message)],
            })?;

            for import in &parsed.imports {
                let outcome = hook
                    .resolve(ModuleReference {
                        specifier: &import.specifier,
                        importer: &path,
                        kind: import.kind,
                    })
                    .await?;
                match outcome {
                    HookOutcome::Inline(target) => queue.push(target),
                    HookOutcome::External(specifier) => externals.push(specifier),
                }
            }
        }

        let mut artifact = format!("// format: {}\n", request.format);
        for path in &inlined {
            artifact.push_str(&format!("// inline {}\n", path.display()));
        }
        for specifier in &externals {
            artifact.push_str(&format!("import \"{specifier}\";\n"));
        }

        if let Some(parent) = request.outfile.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::Runtime(RuntimeError::Io(e.to_string())))?;
        }
        fs::write(request.outfile, artifact).map_err(|e| Error::Runtime(RuntimeError::Io(e.to_string())))?;
        Ok(())
    }
}
