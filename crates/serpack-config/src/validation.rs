//! Schema validation for build options.
//!
//! Runs before anything touches the filesystem, so a bad template or format
//! never leaves half-written output behind.

use std::path::{Component, Path};

use indexmap::IndexSet;

use crate::error::{ConfigError, Result};
use crate::options::BuildOptions;
use crate::template::ChunkNameTemplate;

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    /// Validate build options
    fn validate(&self, options: &BuildOptions) -> Result<()>;
}

/// Schema-only validation (no filesystem checks)
///
/// # Example
///
/// ```
/// use serpack_config::{BuildOptions, ConfigValidator, SchemaValidator};
///
/// let options = BuildOptions::new().entry("index", "src/index.ts");
/// SchemaValidator.validate(&options).unwrap();
/// ```
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, options: &BuildOptions) -> Result<()> {
        if options.entries.is_empty() {
            return Err(ConfigError::NoEntries);
        }

        let mut aliases = IndexSet::new();
        for entry in &options.entries {
            if entry.alias.trim().is_empty() {
                return Err(ConfigError::schema(
                    format!("entry '{}' has an empty alias", entry.path.display()),
                    "Every entry needs an alias; it becomes the output file name",
                ));
            }
            if !is_relative_output(&entry.alias) {
                return Err(ConfigError::schema(
                    format!(
                        "entry alias '{}' must name a file inside the output directory",
                        entry.alias
                    ),
                    "Use plain names or nested ones such as \"lib/index\", without '..' or a leading '/'",
                ));
            }
            if !aliases.insert(entry.alias.as_str()) {
                return Err(ConfigError::schema(
                    format!("entry alias '{}' is declared twice", entry.alias),
                    "Two entries with one alias would write the same output file",
                ));
            }
            if entry.path.as_os_str().is_empty() {
                return Err(ConfigError::schema(
                    format!("entry '{}' has an empty path", entry.alias),
                    "Point the entry at a module file",
                ));
            }
        }

        if options.formats.is_empty() {
            return Err(ConfigError::schema(
                "no output formats requested",
                "Set 'formats' to [\"cjs\"], [\"esm\"] or both",
            ));
        }
        let mut formats = IndexSet::new();
        for format in &options.formats {
            if !formats.insert(*format) {
                return Err(ConfigError::schema(
                    format!("output format '{format}' is listed twice"),
                    "Remove the duplicate from 'formats'",
                ));
            }
        }

        for (format, extension) in [
            ("cjs", &options.extensions.cjs),
            ("esm", &options.extensions.esm),
        ] {
            if !extension.starts_with('.') || extension.len() < 2 {
                return Err(ConfigError::schema(
                    format!("extension '{extension}' for {format} must start with '.'"),
                    "Use an extension such as \".js\", \".cjs\" or \".mjs\"",
                ));
            }
        }

        for external in &options.externals {
            if external.trim().is_empty() {
                return Err(ConfigError::schema(
                    "external package names cannot be empty",
                    "Remove empty strings from the 'externals' array",
                ));
            }
        }

        let escapes = options.chunks.dir.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes {
            return Err(ConfigError::schema(
                format!(
                    "chunk directory '{}' must stay inside the output directory",
                    options.chunks.dir.display()
                ),
                "Use a relative path without '..', such as \"chunks\"",
            ));
        }

        let template = ChunkNameTemplate::parse(&options.chunks.name)?;
        if !template.has_index() {
            tracing::warn!(
                template = template.as_str(),
                "chunk name template has no [index] placeholder; chunk names may collide"
            );
        }

        Ok(())
    }
}

/// Alias usable as an output path: only normal segments, no trailing separator.
fn is_relative_output(alias: &str) -> bool {
    if alias.ends_with(['/', '\\']) || alias.contains('\\') {
        return false;
    }
    alias.split('/').all(|segment| {
        let mut components = Path::new(segment).components();
        matches!(components.next(), Some(Component::Normal(_))) && components.next().is_none()
    })
}

/// Convenience function for schema-only validation
pub fn validate_schema(options: &BuildOptions) -> Result<()> {
    SchemaValidator.validate(options)
}
