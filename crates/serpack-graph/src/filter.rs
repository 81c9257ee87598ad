//! Which resolved modules the graph walks into.

use std::path::{Component, Path};

use serpack_config::BuildOptions;

use crate::resolver::is_external;

/// Inclusion predicate shared by the analyzer and the bundler hook.
///
/// A module is walked (and may be compiled) only when it is not vendored
/// under `node_modules` (while that exclusion is on) and not named in the
/// externals list.
#[derive(Debug, Clone, Default)]
pub struct InclusionPolicy {
    pub exclude_node_modules: bool,
    pub externals: Vec<String>,
}

impl InclusionPolicy {
    pub fn new(exclude_node_modules: bool, externals: Vec<String>) -> Self {
        Self {
            exclude_node_modules,
            externals,
        }
    }

    pub fn from_options(options: &BuildOptions) -> Self {
        Self::new(options.exclude_node_modules, options.externals.clone())
    }

    /// Specifier-level check, before any resolution happens.
    pub fn is_external_specifier(&self, specifier: &str) -> bool {
        is_external(specifier, &self.externals)
    }

    /// Whether `path` lies inside a `node_modules` directory.
    pub fn is_vendored(path: &Path) -> bool {
        path.components()
            .any(|c| matches!(c, Component::Normal(name) if name == "node_modules"))
    }

    /// Whether a resolved module should be followed.
    pub fn includes(&self, resolved: &Path) -> bool {
        if self.exclude_node_modules && Self::is_vendored(resolved) {
            return false;
        }
        let as_str = resolved.to_string_lossy();
        !self.externals.iter().any(|ext| *ext == as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn vendored_modules_are_excluded_when_enabled() {
        let path = PathBuf::from("/p/node_modules/dep/index.js");
        assert!(!InclusionPolicy::new(true, vec![]).includes(&path));
        assert!(InclusionPolicy::new(false, vec![]).includes(&path));
    }

    #[test]
    fn directory_named_like_node_modules_is_not_vendored() {
        assert!(!InclusionPolicy::is_vendored(Path::new("/p/my_node_modules/x.js")));
    }

    #[test]
    fn explicit_external_path_is_excluded() {
        let policy = InclusionPolicy::new(false, vec!["/p/src/legacy.js".to_string()]);
        assert!(!policy.includes(Path::new("/p/src/legacy.js")));
        assert!(policy.includes(Path::new("/p/src/modern.js")));
    }
}
