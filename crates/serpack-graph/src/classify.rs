//! Shared chunk classification.
//!
//! For every analyzed file, splits its file dependencies into modules that
//! are inlined into the file's artifact and modules that are promoted to a
//! shared chunk. A module with more than one distinct importer anywhere in
//! the merged index is promoted for every importer; a module with one
//! importer is inlined. Builtins, externals and dynamic imports never take
//! part.

use std::path::{Path, PathBuf};

use crate::index::DependencyIndex;
use crate::record::ImportTarget;
use crate::{FxIndexMap, FxIndexSet};

/// Inline/promote partition for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationRecord {
    /// Dependencies compiled into this file's artifact
    pub include: FxIndexSet<PathBuf>,
    /// Dependencies referenced through a shared chunk
    pub exclude: FxIndexSet<PathBuf>,
}

/// Classification for a whole build.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    records: FxIndexMap<PathBuf, ClassificationRecord>,
}

impl Classification {
    pub fn get(&self, file: &Path) -> Option<&ClassificationRecord> {
        self.records.get(file)
    }

    /// Whether `target` is promoted when referenced from `root`.
    pub fn is_excluded(&self, root: &Path, target: &Path) -> bool {
        self.records
            .get(root)
            .is_some_and(|record| record.exclude.contains(target))
    }

    /// Every module promoted by at least one importer.
    pub fn shared_modules(&self) -> FxIndexSet<&Path> {
        self.records
            .values()
            .flat_map(|record| record.exclude.iter().map(PathBuf::as_path))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &ClassificationRecord)> {
        self.records.iter().map(|(path, record)| (path.as_path(), record))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Classify every file in the merged index.
pub fn classify(index: &DependencyIndex) -> Classification {
    let mut records = FxIndexMap::default();

    for (file, targets) in index.dependencies() {
        let mut record = ClassificationRecord::default();
        for target in targets {
            let ImportTarget::File(target) = target else {
                continue;
            };
            if target == file {
                continue;
            }
            if index.importer_count(target) > 1 {
                record.exclude.insert(target.clone());
            } else {
                record.include.insert(target.clone());
            }
        }
        records.insert(file.clone(), record);
    }

    let classification = Classification { records };
    tracing::debug!(
        files = classification.len(),
        shared = classification.shared_modules().len(),
        "classified dependencies"
    );
    classification
}
