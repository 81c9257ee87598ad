//! TypeScript declaration emission.
//!
//! Runs OXC isolated declarations over the analyzed TypeScript sources and
//! writes `.d.ts` files that mirror the source layout under one directory.
//! A file that cannot be declared is reported and skipped; the rest of the
//! batch still runs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use oxc_allocator::Allocator;
use oxc_codegen::Codegen;
use oxc_isolated_declarations::{IsolatedDeclarations, IsolatedDeclarationsOptions};
use oxc_parser::Parser;
use oxc_span::SourceType as OxcSourceType;
use serpack_graph::InclusionPolicy;
use serpack_graph::runtime::Runtime;

/// Outcome of a declaration pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationReport {
    /// Declaration files written, absolute
    pub written: Vec<PathBuf>,
    /// Sources that failed, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

impl DeclarationReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Generate declarations for one TypeScript source.
pub fn generate_dts(path: &Path, source: &str, strip_internal: bool) -> Result<String> {
    let allocator = Allocator::default();
    let source_type = OxcSourceType::from_path(path)
        .with_context(|| format!("Invalid TypeScript file: {}", path.display()))?;

    let parsed = Parser::new(&allocator, source, source_type).parse();
    if !parsed.errors.is_empty() {
        let messages: Vec<String> = parsed.errors.iter().map(|e| e.to_string()).collect();
        anyhow::bail!(
            "Failed to parse {}: {}",
            path.display(),
            messages.join(", ")
        );
    }

    let declarations = IsolatedDeclarations::new(&allocator, IsolatedDeclarationsOptions { strip_internal })
        .build(&parsed.program);
    if !declarations.errors.is_empty() {
        let messages: Vec<String> = declarations.errors.iter().map(|e| e.to_string()).collect();
        anyhow::bail!(
            "Errors generating declarations for {}: {}",
            path.display(),
            messages.join(", ")
        );
    }

    Ok(Codegen::new().build(&declarations.program).code)
}

/// Whether `path` is a TypeScript source that gets a declaration file.
pub fn is_declarable(path: &Path) -> bool {
    if InclusionPolicy::is_vendored(path) {
        return false;
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    if name.ends_with(".d.ts") || name.ends_with(".d.mts") || name.ends_with(".d.cts") {
        return false;
    }
    declaration_extension(path).is_some()
}

fn declaration_extension(path: &Path) -> Option<&'static str> {
    match path.extension()?.to_str()? {
        "ts" | "tsx" => Some("d.ts"),
        "mts" => Some("d.mts"),
        "cts" => Some("d.cts"),
        _ => None,
    }
}

/// Deepest directory containing every path.
fn common_base<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Option<PathBuf> {
    let mut base: Option<PathBuf> = None;
    for path in paths {
        let dir = path.parent().unwrap_or(path);
        base = Some(match base {
            None => dir.to_path_buf(),
            Some(current) => current
                .components()
                .zip(dir.components())
                .take_while(|(a, b)| a == b)
                .map(|(a, _)| a)
                .collect(),
        });
    }
    base
}

/// Write declarations for every declarable source into `outdir`.
///
/// Output paths keep each source's position relative to the deepest common
/// directory of the batch.
pub async fn emit_declarations<'a>(
    sources: impl IntoIterator<Item = (&'a Path, &'a str)>,
    outdir: &Path,
    runtime: &dyn Runtime,
) -> DeclarationReport {
    let sources: Vec<(&Path, &str)> = sources
        .into_iter()
        .filter(|(path, _)| is_declarable(path))
        .collect();
    let mut report = DeclarationReport::default();
    let Some(base) = common_base(sources.iter().map(|(path, _)| *path)) else {
        return report;
    };

    for (path, source) in sources {
        let Some(extension) = declaration_extension(path) else {
            continue;
        };
        let relative = path.strip_prefix(&base).unwrap_or(path);
        let target = outdir.join(relative).with_extension(extension);

        let written = match generate_dts(path, source, false) {
            Ok(code) => runtime
                .write_file(&target, code.as_bytes())
                .await
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match written {
            Ok(()) => {
                tracing::debug!(source = %path.display(), output = %target.display(), "emitted declarations");
                report.written.push(target);
            }
            Err(reason) => {
                tracing::warn!(source = %path.display(), %reason, "skipping declarations");
                report.failed.push((path.to_path_buf(), reason));
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_declarations_for_exported_functions() {
        let code = generate_dts(
            Path::new("/src/math.ts"),
            "export function add(a: number, b: number): number { return a + b; }",
            false,
        )
        .unwrap();
        assert!(code.contains("export declare function add(a: number, b: number): number;"));
    }

    #[test]
    fn missing_annotations_fail() {
        let err = generate_dts(
            Path::new("/src/bad.ts"),
            "export function add(a, b) { return a + b; }",
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("/src/bad.ts"));
    }

    #[test]
    fn declarable_sources() {
        assert!(is_declarable(Path::new("/p/src/a.ts")));
        assert!(is_declarable(Path::new("/p/src/a.tsx")));
        assert!(is_declarable(Path::new("/p/src/a.mts")));
        assert!(!is_declarable(Path::new("/p/src/a.d.ts")));
        assert!(!is_declarable(Path::new("/p/src/a.js")));
        assert!(!is_declarable(Path::new("/p/node_modules/x/index.ts")));
    }

    #[test]
    fn extension_follows_module_flavor() {
        assert_eq!(declaration_extension(Path::new("a.cts")), Some("d.cts"));
        assert_eq!(declaration_extension(Path::new("a.tsx")), Some("d.ts"));
    }

    #[test]
    fn common_base_of_nested_sources() {
        let base = common_base([
            Path::new("/p/src/a.ts"),
            Path::new("/p/src/lib/b.ts"),
        ]);
        assert_eq!(base, Some(PathBuf::from("/p/src")));
    }
}
