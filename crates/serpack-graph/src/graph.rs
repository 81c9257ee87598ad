use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::FxIndexMap;
use crate::record::FileRecord;

/// Every module reachable from one entry, entry first.
#[derive(Debug, Clone)]
pub struct ModuleGraph {
    entry: PathBuf,
    files: FxIndexMap<PathBuf, Arc<FileRecord>>,
}

impl ModuleGraph {
    pub(crate) fn new(entry: PathBuf, files: FxIndexMap<PathBuf, Arc<FileRecord>>) -> Self {
        Self { entry, files }
    }

    pub fn entry(&self) -> &Path {
        &self.entry
    }

    pub fn get(&self, path: &Path) -> Option<&Arc<FileRecord>> {
        self.files.get(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Records in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Arc<FileRecord>)> {
        self.files.iter().map(|(path, record)| (path.as_path(), record))
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }
}
