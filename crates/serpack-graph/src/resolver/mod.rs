//! Module resolution seam.
//!
//! The graph builder and the bundler hook both resolve specifiers through
//! [`Resolver`]. [`NodeResolver`] is the default node-compatible
//! implementation; tests and hosts can swap in their own.

mod node;

pub use node::NodeResolver;

use std::path::{Path, PathBuf};

/// Resolution failure.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Cannot resolve '{specifier}' from '{}': {reason}", from_dir.display())]
pub struct ResolveError {
    pub specifier: String,
    pub from_dir: PathBuf,
    pub reason: String,
}

/// Resolves a specifier relative to the directory of the importing file.
pub trait Resolver: Send + Sync + std::fmt::Debug {
    fn resolve(&self, from_dir: &Path, specifier: &str) -> Result<PathBuf, ResolveError>;
}

/// Check if a specifier names one of the configured externals.
///
/// Matches the package itself and any of its subpaths:
/// `react` matches `react` and `react/jsx-runtime`, not `react-dom`.
pub fn is_external(specifier: &str, externals: &[String]) -> bool {
    externals.iter().any(|ext| {
        specifier == ext
            || specifier
                .strip_prefix(ext.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    })
}
