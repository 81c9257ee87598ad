//! Shared test utilities for graph tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serpack_config::ResolverOptions;
use serpack_graph::runtime::native::NativeRuntime;
use serpack_graph::{Analyzer, InclusionPolicy, NodeResolver};
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

pub fn analyzer(root: &Path, policy: InclusionPolicy) -> Analyzer {
    Analyzer::new(
        Arc::new(NodeResolver::new(&ResolverOptions::default(), root)),
        Arc::new(NativeRuntime),
        policy,
    )
}
