//! Module graph analysis for serpack.
//!
//! The pipeline runs leaves first:
//!
//! 1. [`Analyzer`] walks each entry and records a [`FileRecord`] per module.
//! 2. [`DependencyIndex`] reduces graphs into dependency/dependents relations
//!    and merges them across entries.
//! 3. [`classify`] decides, per file, which dependencies are inlined and which
//!    are promoted to shared chunks.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use serpack_config::ResolverOptions;
//! use serpack_graph::runtime::native::NativeRuntime;
//! use serpack_graph::{Analyzer, DependencyIndex, InclusionPolicy, NodeResolver, classify};
//!
//! # async fn demo() -> Result<(), serpack_graph::AnalyzeError> {
//! let cwd = Path::new("/project");
//! let analyzer = Analyzer::new(
//!     Arc::new(NodeResolver::new(&ResolverOptions::default(), cwd)),
//!     Arc::new(NativeRuntime),
//!     InclusionPolicy::new(true, Vec::new()),
//! );
//!
//! let mut index = DependencyIndex::new();
//! for entry in ["/project/src/a.ts", "/project/src/b.ts"] {
//!     let graph = analyzer.analyze(Path::new(entry)).await?;
//!     index.merge(&DependencyIndex::from_graph(&graph));
//! }
//! let classification = classify(&index);
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod builtin;
pub mod classify;
pub mod filter;
pub mod graph;
pub mod index;
pub mod parser;
pub mod record;
pub mod resolver;
pub mod runtime;

pub use analyzer::{AnalyzeError, Analyzer};
pub use builtin::is_builtin;
pub use classify::{Classification, ClassificationRecord, classify};
pub use filter::InclusionPolicy;
pub use graph::ModuleGraph;
pub use index::DependencyIndex;
pub use parser::{ParseError, ParsedModule, parse_module};
pub use record::{FileRecord, ImportEdge, ImportKind, ImportTarget};
pub use resolver::{NodeResolver, ResolveError, Resolver, is_external};

/// Insertion-ordered map with the Fx hasher.
pub type FxIndexMap<K, V> = indexmap::IndexMap<K, V, rustc_hash::FxBuildHasher>;

/// Insertion-ordered set with the Fx hasher.
pub type FxIndexSet<T> = indexmap::IndexSet<T, rustc_hash::FxBuildHasher>;

#[cfg(test)]
mod tests;
