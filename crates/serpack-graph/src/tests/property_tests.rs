//! Property-based tests for the dependency index and classifier.

use std::path::{Path, PathBuf};

use proptest::prelude::*;

use crate::index::tests::record;
use crate::{DependencyIndex, ImportTarget, classify};

/// Edges over a small pool of files so that sharing actually happens.
fn edges_strategy() -> impl Strategy<Value = Vec<(u8, Vec<u8>)>> {
    prop::collection::vec((0u8..8, prop::collection::vec(0u8..8, 0..5)), 1..12)
}

fn path(n: u8) -> PathBuf {
    PathBuf::from(format!("/src/m{n}.js"))
}

fn build(edges: &[(u8, Vec<u8>)]) -> DependencyIndex {
    let mut index = DependencyIndex::new();
    for (from, targets) in edges {
        let from = path(*from);
        let targets: Vec<_> = targets.iter().map(|t| ImportTarget::File(path(*t))).collect();
        let mut part = DependencyIndex::new();
        part.insert_file(&from, &record(&from.to_string_lossy(), &targets));
        index.merge(&part);
    }
    index
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// ∀ A,B: B ∈ dependents[A] ⟺ A ∈ dependencies[B]
    #[test]
    fn prop_index_is_inverse(edges in edges_strategy()) {
        prop_assert!(build(&edges).is_consistent());
    }

    /// Every file edge lands in exactly one side, and the side matches the
    /// importer count.
    #[test]
    fn prop_classification_partitions_edges(edges in edges_strategy()) {
        let index = build(&edges);
        let classification = classify(&index);

        for (file, targets) in index.dependencies() {
            let record = classification.get(file).expect("record per file");
            prop_assert!(record.include.is_disjoint(&record.exclude));

            for target in targets.iter().filter_map(ImportTarget::as_file) {
                if target == file.as_path() {
                    continue;
                }
                let shared = index.importer_count(target) > 1;
                prop_assert_eq!(record.exclude.contains(target), shared);
                prop_assert_eq!(record.include.contains(target), !shared);
            }
        }
    }

    /// A promoted module is promoted for all of its importers.
    #[test]
    fn prop_shared_modules_excluded_everywhere(edges in edges_strategy()) {
        let index = build(&edges);
        let classification = classify(&index);

        for shared in classification.shared_modules() {
            let key = ImportTarget::File(shared.to_path_buf());
            for importer in index.dependents_of(&key).into_iter().flatten() {
                if importer.as_path() == shared {
                    continue;
                }
                prop_assert!(classification.is_excluded(importer, Path::new(shared)));
            }
        }
    }
}
