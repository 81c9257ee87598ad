//! Dependency and dependents index.
//!
//! Two adjacency relations over the module graph that are exact inverses:
//! `B ∈ dependents[A]` iff `A ∈ dependencies[B]`. Indexes from several entries
//! are merged before classification so sharing is judged across the whole
//! build, not per entry.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::graph::ModuleGraph;
use crate::record::{FileRecord, ImportTarget};
use crate::{FxIndexMap, FxIndexSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyIndex {
    dependencies: FxIndexMap<PathBuf, FxIndexSet<ImportTarget>>,
    dependents: FxIndexMap<ImportTarget, FxIndexSet<PathBuf>>,
}

impl DependencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_graph(graph: &ModuleGraph) -> Self {
        let mut index = Self::new();
        for (path, record) in graph.iter() {
            index.insert_file(path, record);
        }
        index
    }

    /// Record one analyzed file and its outgoing edges.
    ///
    /// The file also gets a (possibly empty) dependents entry, so every
    /// analyzed module shows up on both sides.
    pub fn insert_file(&mut self, path: &Path, record: &FileRecord) {
        self.dependents
            .entry(ImportTarget::File(path.to_path_buf()))
            .or_default();

        let deps = self.dependencies.entry(path.to_path_buf()).or_default();
        for edge in &record.imports {
            deps.insert(edge.target.clone());
            self.dependents
                .entry(edge.target.clone())
                .or_default()
                .insert(path.to_path_buf());
        }
    }

    /// Union another index into this one.
    pub fn merge(&mut self, other: &DependencyIndex) {
        for (file, targets) in &other.dependencies {
            self.dependencies
                .entry(file.clone())
                .or_default()
                .extend(targets.iter().cloned());
        }
        for (target, files) in &other.dependents {
            self.dependents
                .entry(target.clone())
                .or_default()
                .extend(files.iter().cloned());
        }
    }

    pub fn dependencies(&self) -> &FxIndexMap<PathBuf, FxIndexSet<ImportTarget>> {
        &self.dependencies
    }

    pub fn dependents(&self) -> &FxIndexMap<ImportTarget, FxIndexSet<PathBuf>> {
        &self.dependents
    }

    pub fn dependencies_of(&self, file: &Path) -> Option<&FxIndexSet<ImportTarget>> {
        self.dependencies.get(file)
    }

    pub fn dependents_of(&self, target: &ImportTarget) -> Option<&FxIndexSet<PathBuf>> {
        self.dependents.get(target)
    }

    /// Number of distinct files importing `target`, not counting `target` itself.
    pub fn importer_count(&self, target: &Path) -> usize {
        let key = ImportTarget::File(target.to_path_buf());
        self.dependents
            .get(&key)
            .map_or(0, |files| files.iter().filter(|f| f.as_path() != target).count())
    }

    /// Analyzed files, in insertion order.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.dependencies.keys().map(PathBuf::as_path)
    }

    /// Check the inverse relation in both directions.
    pub fn is_consistent(&self) -> bool {
        let forward = self.dependencies.iter().all(|(file, targets)| {
            targets.iter().all(|target| {
                self.dependents
                    .get(target)
                    .is_some_and(|files| files.contains(file))
            })
        });
        let backward = self.dependents.iter().all(|(target, files)| {
            files.iter().all(|file| {
                self.dependencies
                    .get(file)
                    .is_some_and(|targets| targets.contains(target))
            })
        });
        forward && backward
    }

    /// Debug dump with display-formatted keys.
    pub fn to_json(&self) -> serde_json::Value {
        let dependencies: BTreeMap<String, Vec<String>> = self
            .dependencies
            .iter()
            .map(|(file, targets)| {
                (
                    file.display().to_string(),
                    targets.iter().map(ToString::to_string).collect(),
                )
            })
            .collect();
        let dependents: BTreeMap<String, Vec<String>> = self
            .dependents
            .iter()
            .map(|(target, files)| {
                (
                    target.to_string(),
                    files.iter().map(|f| f.display().to_string()).collect(),
                )
            })
            .collect();

        serde_json::json!({
            "files": self.dependencies.len(),
            "dependencies": dependencies,
            "dependents": dependents,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::record::{ImportEdge, ImportKind};

    pub(crate) fn record(path: &str, targets: &[ImportTarget]) -> FileRecord {
        FileRecord {
            path: PathBuf::from(path),
            source: String::new(),
            imports: targets
                .iter()
                .map(|target| ImportEdge {
                    raw: String::new(),
                    specifier: target.to_string(),
                    target: target.clone(),
                    kind: match target {
                        ImportTarget::Dynamic(_) => ImportKind::Dynamic,
                        _ => ImportKind::Static,
                    },
                })
                .collect(),
            exports: Some(Vec::new()),
        }
    }

    fn file(path: &str) -> ImportTarget {
        ImportTarget::File(PathBuf::from(path))
    }

    #[test]
    fn builds_inverse_relations() {
        let mut index = DependencyIndex::new();
        index.insert_file(
            Path::new("/a.js"),
            &record("/a.js", &[file("/u.js"), ImportTarget::Builtin("fs".into())]),
        );
        index.insert_file(Path::new("/u.js"), &record("/u.js", &[]));

        assert!(index.is_consistent());
        assert_eq!(
            index.dependents_of(&file("/u.js")).unwrap().len(),
            1,
            "u.js is imported once"
        );
        assert!(index.dependents_of(&file("/a.js")).unwrap().is_empty());
        assert!(
            index
                .dependents_of(&ImportTarget::Builtin("fs".into()))
                .unwrap()
                .contains(Path::new("/a.js"))
        );
    }

    #[test]
    fn merge_unions_both_sides() {
        let mut left = DependencyIndex::new();
        left.insert_file(Path::new("/a.js"), &record("/a.js", &[file("/u.js")]));
        let mut right = DependencyIndex::new();
        right.insert_file(Path::new("/b.js"), &record("/b.js", &[file("/u.js")]));

        left.merge(&right);
        assert!(left.is_consistent());
        assert_eq!(left.importer_count(Path::new("/u.js")), 2);
        assert_eq!(left.files().count(), 2);
    }

    #[test]
    fn merging_an_index_twice_is_idempotent() {
        let mut base = DependencyIndex::new();
        base.insert_file(Path::new("/a.js"), &record("/a.js", &[file("/u.js")]));
        let copy = base.clone();
        base.merge(&copy);
        assert_eq!(base, copy);
    }

    #[test]
    fn self_import_does_not_count_as_importer() {
        let mut index = DependencyIndex::new();
        index.insert_file(Path::new("/a.js"), &record("/a.js", &[file("/a.js")]));
        assert_eq!(index.importer_count(Path::new("/a.js")), 0);
    }

    #[test]
    fn json_dump_lists_every_file() {
        let mut index = DependencyIndex::new();
        index.insert_file(Path::new("/a.js"), &record("/a.js", &[file("/u.js")]));
        let json = index.to_json();
        assert_eq!(json["files"], 1);
        assert_eq!(json["dependents"]["/u.js"][0], "/a.js");
    }
}
