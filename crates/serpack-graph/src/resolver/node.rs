use std::path::{Path, PathBuf};

use oxc_resolver::{AliasValue, ResolveOptions};
use serpack_config::ResolverOptions;

use super::{ResolveError, Resolver};

/// Node-compatible resolver backed by `oxc_resolver`.
///
/// Honors `exports`/`imports` conditions, main fields, extension probing,
/// directory indexes and path aliases.
pub struct NodeResolver {
    inner: oxc_resolver::Resolver,
}

impl std::fmt::Debug for NodeResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeResolver").finish_non_exhaustive()
    }
}

impl NodeResolver {
    /// Build a resolver from config. Relative alias targets and roots are
    /// joined onto `cwd`.
    pub fn new(options: &ResolverOptions, cwd: &Path) -> Self {
        let alias = options
            .alias
            .iter()
            .map(|(from, to)| {
                let target = path_clean::clean(cwd.join(to));
                (
                    from.clone(),
                    vec![AliasValue::Path(target.to_string_lossy().into_owned())],
                )
            })
            .collect();

        let inner = oxc_resolver::Resolver::new(ResolveOptions {
            extensions: options.extensions.clone(),
            condition_names: options.condition_names.clone(),
            main_fields: options.main_fields.clone(),
            alias,
            roots: options.roots.iter().map(|r| cwd.join(r)).collect(),
            ..ResolveOptions::default()
        });

        Self { inner }
    }
}

impl Resolver for NodeResolver {
    fn resolve(&self, from_dir: &Path, specifier: &str) -> Result<PathBuf, ResolveError> {
        self.inner
            .resolve(from_dir, specifier)
            .map(|resolution| resolution.full_path())
            .map_err(|e| ResolveError {
                specifier: specifier.to_string(),
                from_dir: from_dir.to_path_buf(),
                reason: e.to_string(),
            })
    }
}
